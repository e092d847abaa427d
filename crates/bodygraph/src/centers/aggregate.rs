//! Combine personality and design activations into center definitions.

use crate::centers::center::{Center, ALL_CENTERS};
use crate::centers::channels::{Channel, CHANNELS};
use crate::gates::GateActivation;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CenterState {
    pub center: Center,
    /// True only when at least one complete channel touches this center
    pub defined: bool,
    /// Activated gates belonging to this center
    pub gates: BTreeSet<u8>,
    /// Complete channels touching this center, as gate pairs
    pub channels: Vec<(u8, u8)>,
}

impl CenterState {
    fn open(center: Center) -> Self {
        Self {
            center,
            defined: false,
            gates: BTreeSet::new(),
            channels: Vec::new(),
        }
    }

    /// Activated gates that are not part of a complete channel.
    pub fn hanging_gates(&self) -> Vec<u8> {
        self.gates
            .iter()
            .copied()
            .filter(|g| !self.channels.iter().any(|(a, b)| a == g || b == g))
            .collect()
    }
}

/// All nine centers plus the complete channels between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenterMap {
    pub centers: BTreeMap<Center, CenterState>,
    pub channels: Vec<Channel>,
    pub active_gates: BTreeSet<u8>,
}

impl CenterMap {
    pub fn get(&self, center: Center) -> &CenterState {
        // Every center is inserted at construction.
        &self.centers[&center]
    }

    pub fn is_defined(&self, center: Center) -> bool {
        self.centers.get(&center).map(|c| c.defined).unwrap_or(false)
    }

    pub fn defined_centers(&self) -> Vec<Center> {
        self.centers
            .values()
            .filter(|c| c.defined)
            .map(|c| c.center)
            .collect()
    }

    pub fn defined_count(&self) -> usize {
        self.centers.values().filter(|c| c.defined).count()
    }

    pub fn has_channel(&self, a: u8, b: u8) -> bool {
        self.channels
            .iter()
            .any(|c| c.gates == (a, b) || c.gates == (b, a))
    }

    /// Any complete channel directly joining `a` and `b`.
    pub fn has_channel_between(&self, a: Center, b: Center) -> bool {
        self.channels.iter().any(|c| c.joins(a, b))
    }
}

/// Build a fresh center map from the union of all activations.
///
/// Gate numbers outside the wheel simply match nothing.
pub fn aggregate_centers<'a, I>(activations: I) -> CenterMap
where
    I: IntoIterator<Item = &'a GateActivation>,
{
    let active_gates: BTreeSet<u8> = activations.into_iter().map(|a| a.gate).collect();
    aggregate_gates(&active_gates)
}

pub fn aggregate_gates(active_gates: &BTreeSet<u8>) -> CenterMap {
    let mut centers: BTreeMap<Center, CenterState> = ALL_CENTERS
        .iter()
        .map(|c| (*c, CenterState::open(*c)))
        .collect();

    for gate in active_gates {
        if let Some(center) = Center::of_gate(*gate) {
            if let Some(state) = centers.get_mut(&center) {
                state.gates.insert(*gate);
            }
        }
    }

    let mut complete = Vec::new();
    for channel in CHANNELS.iter() {
        let (a, b) = channel.gates;
        if !(active_gates.contains(&a) && active_gates.contains(&b)) {
            continue;
        }
        for center in [channel.centers.0, channel.centers.1] {
            if let Some(state) = centers.get_mut(&center) {
                state.defined = true;
                state.channels.push(channel.gates);
            }
        }
        log::debug!("Channel {} ({}) complete", channel.key(), channel.name);
        complete.push(*channel);
    }

    CenterMap {
        centers,
        channels: complete,
        active_gates: active_gates.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gates(list: &[u8]) -> BTreeSet<u8> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_hanging_gate_leaves_center_open() {
        let map = aggregate_gates(&gates(&[34]));
        let sacral = map.get(Center::Sacral);
        assert!(sacral.gates.contains(&34));
        assert!(!sacral.defined);
        assert_eq!(sacral.hanging_gates(), vec![34]);
        assert_eq!(map.defined_count(), 0);
    }

    #[test]
    fn test_channel_defines_both_ends() {
        let map = aggregate_gates(&gates(&[34, 20, 5]));
        assert!(map.is_defined(Center::Sacral));
        assert!(map.is_defined(Center::Throat));
        assert_eq!(map.get(Center::Sacral).channels, vec![(34, 20)]);
        assert_eq!(map.get(Center::Throat).channels, vec![(34, 20)]);
        assert_eq!(map.get(Center::Sacral).hanging_gates(), vec![5]);
        assert!(map.has_channel(20, 34));
    }

    #[test]
    fn test_out_of_range_gates_ignored() {
        let map = aggregate_gates(&gates(&[0, 65, 200]));
        assert_eq!(map.defined_count(), 0);
        assert!(map.centers.values().all(|c| c.gates.is_empty()));
    }
}
