//! Blueprint assembly: the full report for one person.

use crate::aspects::{Aspect, AspectCalculator, AspectSettings};
use crate::centers::{
    aggregate_centers, derive_authority, derive_cross, derive_definition, derive_profile,
    derive_type, Authority, Center, CenterState, Definition, DefinitionMode, HdType,
    IncarnationCross, Profile,
};
use crate::chinese::{chinese_zodiac, ChineseZodiac};
use crate::ephemeris::{
    resolve_design, EphemerisSource, GeoLocation, PlanetSet, DESIGN_OFFSET_DAYS,
};
use crate::error::ChartError;
use crate::gates::{activations_from_set, ExtractOptions, GateActivation, WheelAlignment};
use crate::numerology::{numerology, parse_birth_date, Numerology};
use crate::western::{summarize, WesternSummary};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Tunables for a chart run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintSettings {
    pub wheel_alignment: WheelAlignment,
    pub definition_mode: DefinitionMode,
    pub include_nodes: bool,
    /// Days between birth and design time
    pub design_offset_days: f64,
    pub aspects: AspectSettings,
}

impl Default for BlueprintSettings {
    fn default() -> Self {
        Self {
            wheel_alignment: WheelAlignment::AriesZero,
            definition_mode: DefinitionMode::Banded,
            include_nodes: true,
            design_offset_days: DESIGN_OFFSET_DAYS,
            aspects: AspectSettings::default(),
        }
    }
}

impl BlueprintSettings {
    fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            alignment: self.wheel_alignment,
            include_nodes: self.include_nodes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanDesignChart {
    #[serde(rename = "type")]
    pub hd_type: HdType,
    pub strategy: String,
    pub not_self_theme: String,
    pub signature: String,
    pub authority: Authority,
    pub profile: Profile,
    pub profile_label: String,
    pub definition: Definition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incarnation_cross: Option<IncarnationCross>,
    pub centers: BTreeMap<Center, CenterState>,
    /// Complete channels as "a-b" keys
    pub channels: Vec<String>,
    pub personality: Vec<GateActivation>,
    pub design: Vec<GateActivation>,
}

/// Compute the Human Design chart from personality and design positions.
pub fn human_design(
    personality: &PlanetSet,
    design: &PlanetSet,
    settings: &BlueprintSettings,
) -> Result<HumanDesignChart, ChartError> {
    let options = settings.extract_options();
    let personality = activations_from_set(personality, options)?;
    let design = activations_from_set(design, options)?;

    let map = aggregate_centers(personality.iter().chain(design.iter()));
    let hd_type = derive_type(&map, settings.definition_mode);
    let profile = derive_profile(&personality, &design);
    let incarnation_cross = derive_cross(&personality, &design, profile);

    log::debug!(
        "Chart: {} defined centers, {} channels, type {}",
        map.defined_count(),
        map.channels.len(),
        hd_type
    );

    Ok(HumanDesignChart {
        hd_type,
        strategy: hd_type.strategy().to_string(),
        not_self_theme: hd_type.not_self_theme().to_string(),
        signature: hd_type.signature().to_string(),
        authority: derive_authority(&map),
        profile,
        profile_label: profile.label(),
        definition: derive_definition(&map, settings.definition_mode),
        incarnation_cross,
        channels: map.channels.iter().map(|c| c.key()).collect(),
        centers: map.centers,
        personality,
        design,
    })
}

/// Raw positions as posted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CelestialData {
    pub personality: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascendant: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlueprintRequest {
    pub full_name: String,
    #[serde(default)]
    pub preferred_name: Option<String>,
    pub birth_date: String,
    #[serde(default)]
    pub birth_time: Option<String>,
    #[serde(default)]
    pub birth_location: Option<String>,
    /// Minutes east of UTC for the local birth time
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub coordinates: Option<GeoLocation>,
    pub celestial_data: CelestialData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMeta {
    pub full_name: String,
    pub preferred_name: String,
    pub birth_date: String,
    pub birth_time_local: String,
    pub birth_time_utc: DateTime<Utc>,
    pub birth_location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Blueprint {
    pub user_meta: UserMeta,
    pub western: WesternSummary,
    pub human_design: HumanDesignChart,
    pub numerology: Numerology,
    pub chinese: ChineseZodiac,
    pub aspects: Vec<Aspect>,
    pub design_approximated: bool,
    pub calculation_method: String,
}

const DEFAULT_BIRTH_TIME: &str = "00:00";

fn parse_birth_time(text: &str) -> Result<NaiveTime, ChartError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text.trim(), "%H:%M:%S"))
        .map_err(|e| ChartError::invalid("birth_time", format!("expected HH:MM ({e})")))
}

/// Widest real-world UTC offset, in minutes (UTC-14:00 to UTC+14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

fn birth_utc(date: NaiveDate, time: NaiveTime, offset_minutes: i32) -> Result<DateTime<Utc>, ChartError> {
    if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&offset_minutes) {
        return Err(ChartError::invalid(
            "utc_offset_minutes",
            format!(
                "must be within ±{} minutes, got {}",
                MAX_UTC_OFFSET_MINUTES, offset_minutes
            ),
        ));
    }
    date.and_time(time)
        .checked_sub_signed(Duration::minutes(i64::from(offset_minutes)))
        .map(|utc| Utc.from_utc_datetime(&utc))
        .ok_or_else(|| ChartError::invalid("birth_date", "birth time is out of range"))
}

/// Build the complete blueprint.
///
/// Design positions come from the request when supplied, otherwise from
/// `source` at design time, otherwise from the mean-motion approximation.
pub fn build_blueprint(
    request: &BlueprintRequest,
    settings: &BlueprintSettings,
    source: Option<&dyn EphemerisSource>,
) -> Result<Blueprint, ChartError> {
    if request.full_name.trim().is_empty() {
        return Err(ChartError::MissingField("full_name".to_string()));
    }
    let date = parse_birth_date(&request.birth_date)?;
    let time_text = request.birth_time.as_deref().unwrap_or(DEFAULT_BIRTH_TIME);
    let time = parse_birth_time(time_text)?;
    let birth_time_utc = birth_utc(date, time, request.utc_offset_minutes)?;

    let personality = PlanetSet::from_json(&request.celestial_data.personality)?;
    let (design, design_approximated) = match &request.celestial_data.design {
        Some(value) => (PlanetSet::from_json(value)?, false),
        None => {
            let resolved = resolve_design(
                source,
                birth_time_utc,
                request.coordinates,
                &personality,
                settings.design_offset_days,
            )?;
            (resolved.positions, resolved.approximated)
        }
    };

    let human_design = human_design(&personality, &design, settings)?;
    let western = summarize(&personality, request.celestial_data.ascendant)?;
    let aspects = AspectCalculator::with_settings(settings.aspects).compute(&personality);

    log::info!(
        "Blueprint for '{}': {} {}, {} aspects",
        request.full_name,
        human_design.hd_type,
        human_design.profile,
        aspects.len()
    );

    let preferred_name = request
        .preferred_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| {
            request
                .full_name
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string()
        });

    Ok(Blueprint {
        user_meta: UserMeta {
            full_name: request.full_name.clone(),
            preferred_name,
            birth_date: request.birth_date.clone(),
            birth_time_local: time_text.to_string(),
            birth_time_utc,
            birth_location: request
                .birth_location
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        },
        western,
        human_design,
        numerology: numerology(date),
        chinese: chinese_zodiac(date.year()),
        aspects,
        design_approximated,
        calculation_method: if design_approximated {
            "ephemeris+mean-motion-design"
        } else {
            "ephemeris"
        }
        .to_string(),
    })
}
