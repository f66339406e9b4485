//! Canonical weather conditions
//!
//! Stations and the forecast service report conditions in their own
//! vocabulary: icon names (`partly-cloudy-day`), condition text
//! (`Partly Cloudy`) or, for legacy payloads, numeric WMO weather codes. The
//! mapper reduces all of them to a small fixed set of canonical classes through
//! two declarative tables. Classification is lossy: an unknown token yields
//! `None`, never an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    ClearNight,
    Cloudy,
    Exceptional,
    Fog,
    Hail,
    Lightning,
    LightningRainy,
    Partlycloudy,
    Pouring,
    Rainy,
    Snowy,
    SnowyRainy,
    Sunny,
    Windy,
    WindyVariant,
}

/// Upstream string tokens per canonical class, in lookup order.
///
/// A token listed under two classes resolves to the earlier one.
const TEXT_TOKENS: &[(Condition, &[&str])] = &[
    (Condition::ClearNight, &["clear-night"]),
    (Condition::Cloudy, &["cloudy"]),
    (Condition::Exceptional, &["cloudy"]),
    (Condition::Fog, &["foggy", "fog"]),
    (Condition::Hail, &["hail"]),
    (Condition::Lightning, &["thunderstorm"]),
    (
        Condition::LightningRainy,
        &["possibly-thunderstorm-day", "possibly-thunderstorm-night"],
    ),
    (
        Condition::Partlycloudy,
        &["partly-cloudy-day", "partly-cloudy-night", "partly cloudy"],
    ),
    (Condition::Pouring, &["rainy", "raining"]),
    (
        Condition::Rainy,
        &[
            "rainy",
            "possibly-rainy-day",
            "possibly-rainy-night",
            "rain possible",
            "rain",
        ],
    ),
    (
        Condition::Snowy,
        &["snow", "snowy", "possibly-snow-day", "possibly-snow-night"],
    ),
    (
        Condition::SnowyRainy,
        &["sleet", "possibly-sleet-day", "possibly-sleet-night"],
    ),
    (Condition::Sunny, &["clear-day", "clear"]),
    (Condition::Windy, &["windy", "wind"]),
    (Condition::WindyVariant, &["windy"]),
];

/// Legacy numeric codes (WMO weather interpretation codes) per canonical class
const LEGACY_CODES: &[(Condition, &[u16])] = &[
    (Condition::Cloudy, &[3]),
    (Condition::Fog, &[45, 48]),
    (Condition::Hail, &[96, 99]),
    (Condition::Lightning, &[95]),
    (Condition::Partlycloudy, &[1, 2]),
    (Condition::Pouring, &[65, 82]),
    (Condition::Rainy, &[51, 53, 55, 61, 63, 80, 81]),
    (Condition::Snowy, &[71, 73, 75, 77, 85, 86]),
    (Condition::SnowyRainy, &[56, 57, 66, 67]),
    (Condition::Sunny, &[0]),
];

/// A condition token as delivered upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionToken<'a> {
    /// Icon name or condition text, matched case-insensitively
    Text(&'a str),
    /// Legacy numeric code, matched exactly
    Code(u16),
}

impl<'a> From<&'a str> for ConditionToken<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl From<u16> for ConditionToken<'_> {
    fn from(value: u16) -> Self {
        Self::Code(value)
    }
}

/// Map an upstream token to its canonical condition
///
/// # Examples
///
/// ```
/// use domain::value_objects::{Condition, map_condition};
///
/// assert_eq!(map_condition("Partly-Cloudy-Day"), Some(Condition::Partlycloudy));
/// assert_eq!(map_condition(95u16), Some(Condition::Lightning));
/// assert_eq!(map_condition("tornado"), None);
/// ```
#[must_use]
pub fn map_condition<'a>(token: impl Into<ConditionToken<'a>>) -> Option<Condition> {
    match token.into() {
        ConditionToken::Text(text) => {
            let text = text.trim();
            TEXT_TOKENS
                .iter()
                .find(|(_, tokens)| tokens.iter().any(|t| t.eq_ignore_ascii_case(text)))
                .map(|(condition, _)| *condition)
        },
        ConditionToken::Code(code) => LEGACY_CODES
            .iter()
            .find(|(_, codes)| codes.contains(&code))
            .map(|(condition, _)| *condition),
    }
}

impl Condition {
    /// All canonical conditions
    pub const ALL: [Self; 15] = [
        Self::ClearNight,
        Self::Cloudy,
        Self::Exceptional,
        Self::Fog,
        Self::Hail,
        Self::Lightning,
        Self::LightningRainy,
        Self::Partlycloudy,
        Self::Pouring,
        Self::Rainy,
        Self::Snowy,
        Self::SnowyRainy,
        Self::Sunny,
        Self::Windy,
        Self::WindyVariant,
    ];

    /// Canonical name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClearNight => "clear-night",
            Self::Cloudy => "cloudy",
            Self::Exceptional => "exceptional",
            Self::Fog => "fog",
            Self::Hail => "hail",
            Self::Lightning => "lightning",
            Self::LightningRainy => "lightning-rainy",
            Self::Partlycloudy => "partlycloudy",
            Self::Pouring => "pouring",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::SnowyRainy => "snowy-rainy",
            Self::Sunny => "sunny",
            Self::Windy => "windy",
            Self::WindyVariant => "windy-variant",
        }
    }

    /// Upstream string tokens accepted for this class
    #[must_use]
    pub fn text_tokens(self) -> &'static [&'static str] {
        TEXT_TOKENS
            .iter()
            .find(|(condition, _)| *condition == self)
            .map_or(&[] as &[&str], |(_, tokens)| *tokens)
    }

    /// Legacy numeric codes accepted for this class
    #[must_use]
    pub fn legacy_codes(self) -> &'static [u16] {
        LEGACY_CODES
            .iter()
            .find(|(condition, _)| *condition == self)
            .map_or(&[] as &[u16], |(_, codes)| *codes)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_tokens() {
        assert_eq!(map_condition("clear-day"), Some(Condition::Sunny));
        assert_eq!(map_condition("clear-night"), Some(Condition::ClearNight));
        assert_eq!(map_condition("foggy"), Some(Condition::Fog));
        assert_eq!(
            map_condition("possibly-thunderstorm-night"),
            Some(Condition::LightningRainy)
        );
        assert_eq!(map_condition("possibly-sleet-day"), Some(Condition::SnowyRainy));
        assert_eq!(map_condition("possibly-snow-night"), Some(Condition::Snowy));
    }

    #[test]
    fn test_condition_text_is_case_insensitive() {
        assert_eq!(map_condition("Partly Cloudy"), Some(Condition::Partlycloudy));
        assert_eq!(map_condition("CLEAR"), Some(Condition::Sunny));
        assert_eq!(map_condition("Rain Possible"), Some(Condition::Rainy));
        assert_eq!(map_condition("  Cloudy "), Some(Condition::Cloudy));
    }

    #[test]
    fn test_shared_token_resolves_to_earlier_class() {
        assert_eq!(map_condition("cloudy"), Some(Condition::Cloudy));
        assert_eq!(map_condition("rainy"), Some(Condition::Pouring));
        assert_eq!(map_condition("windy"), Some(Condition::Windy));
    }

    #[test]
    fn test_every_text_token_maps_to_a_class_that_lists_it() {
        for condition in Condition::ALL {
            for token in condition.text_tokens() {
                let mapped = map_condition(*token).expect("listed token must map");
                assert!(
                    mapped.text_tokens().contains(token),
                    "{token} mapped to {mapped}, which does not list it"
                );
            }
        }
    }

    #[test]
    fn test_unique_text_tokens_map_to_own_class() {
        for condition in Condition::ALL {
            for token in condition.text_tokens() {
                let owners = Condition::ALL
                    .iter()
                    .filter(|c| c.text_tokens().contains(token))
                    .count();
                if owners == 1 {
                    assert_eq!(map_condition(*token), Some(condition));
                }
            }
        }
    }

    #[test]
    fn test_every_legacy_code_maps_to_own_class() {
        for condition in Condition::ALL {
            for code in condition.legacy_codes() {
                assert_eq!(map_condition(*code), Some(condition));
            }
        }
    }

    #[test]
    fn test_unknown_tokens_map_to_none() {
        assert_eq!(map_condition("tornado"), None);
        assert_eq!(map_condition(""), None);
        assert_eq!(map_condition(100u16), None);
        assert_eq!(map_condition(4u16), None);
    }

    #[test]
    fn test_numeric_and_text_schemes_do_not_mix() {
        assert_eq!(map_condition("3"), None);
        assert_eq!(map_condition(0u16), Some(Condition::Sunny));
    }

    #[test]
    fn test_condition_serialization_matches_display() {
        for condition in Condition::ALL {
            let json = serde_json::to_string(&condition).unwrap();
            assert_eq!(json, format!("\"{condition}\""));
        }
    }
}
