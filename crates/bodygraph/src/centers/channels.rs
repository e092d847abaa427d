use crate::centers::center::Center;
use serde::Serialize;

/// A fixed pair of gates joining two centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Channel {
    pub gates: (u8, u8),
    pub name: &'static str,
    pub centers: (Center, Center),
}

impl Channel {
    const fn new(a: u8, b: u8, name: &'static str, from: Center, to: Center) -> Self {
        Self {
            gates: (a, b),
            name,
            centers: (from, to),
        }
    }

    /// "34-20" style key, gates in table order.
    pub fn key(&self) -> String {
        format!("{}-{}", self.gates.0, self.gates.1)
    }

    pub fn joins(&self, a: Center, b: Center) -> bool {
        (self.centers.0 == a && self.centers.1 == b) || (self.centers.0 == b && self.centers.1 == a)
    }
}

use crate::centers::center::Center::*;

pub static CHANNELS: [Channel; 36] = [
    Channel::new(1, 8, "Inspiration", G, Throat),
    Channel::new(2, 14, "The Beat", G, Sacral),
    Channel::new(3, 60, "Mutation", Sacral, Root),
    Channel::new(4, 63, "Logic", Ajna, Head),
    Channel::new(5, 15, "Rhythm", Sacral, G),
    Channel::new(6, 59, "Mating", SolarPlexus, Sacral),
    Channel::new(7, 31, "The Alpha", G, Throat),
    Channel::new(9, 52, "Concentration", Sacral, Root),
    Channel::new(10, 20, "Awakening", G, Throat),
    Channel::new(10, 34, "Exploration", G, Sacral),
    Channel::new(10, 57, "Perfected Form", G, Spleen),
    Channel::new(11, 56, "Curiosity", Ajna, Throat),
    Channel::new(12, 22, "Openness", Throat, SolarPlexus),
    Channel::new(13, 33, "The Prodigal", G, Throat),
    Channel::new(16, 48, "The Wavelength", Throat, Spleen),
    Channel::new(17, 62, "Acceptance", Ajna, Throat),
    Channel::new(18, 58, "Judgment", Spleen, Root),
    Channel::new(19, 49, "Synthesis", Root, SolarPlexus),
    Channel::new(34, 20, "Charisma", Sacral, Throat),
    Channel::new(20, 57, "The Brainwave", Throat, Spleen),
    Channel::new(21, 45, "Money", Heart, Throat),
    Channel::new(23, 43, "Structuring", Throat, Ajna),
    Channel::new(24, 61, "Awareness", Ajna, Head),
    Channel::new(25, 51, "Initiation", G, Heart),
    Channel::new(26, 44, "Surrender", Heart, Spleen),
    Channel::new(27, 50, "Preservation", Sacral, Spleen),
    Channel::new(28, 38, "Struggle", Spleen, Root),
    Channel::new(29, 46, "Discovery", Sacral, G),
    Channel::new(30, 41, "Recognition", SolarPlexus, Root),
    Channel::new(32, 54, "Transformation", Spleen, Root),
    Channel::new(35, 36, "Transitoriness", Throat, SolarPlexus),
    Channel::new(37, 40, "Community", SolarPlexus, Heart),
    Channel::new(39, 55, "Emoting", Root, SolarPlexus),
    Channel::new(42, 53, "Maturation", Sacral, Root),
    Channel::new(47, 64, "Abstraction", Ajna, Head),
    Channel::new(57, 34, "Power", Spleen, Sacral),
];

/// Look up a channel by its two gates in either order.
pub fn find_channel(a: u8, b: u8) -> Option<&'static Channel> {
    CHANNELS
        .iter()
        .find(|c| c.gates == (a, b) || c.gates == (b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_centers_match_gate_owners() {
        for channel in &CHANNELS {
            let (a, b) = channel.gates;
            assert_eq!(Center::of_gate(a), Some(channel.centers.0), "{}", channel.key());
            assert_eq!(Center::of_gate(b), Some(channel.centers.1), "{}", channel.key());
        }
    }

    #[test]
    fn test_find_channel_either_order() {
        assert_eq!(find_channel(20, 34).map(|c| c.name), Some("Charisma"));
        assert_eq!(find_channel(34, 20).map(|c| c.name), Some("Charisma"));
        assert!(find_channel(1, 2).is_none());
    }
}
