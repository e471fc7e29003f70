//! Parameter id and value validation.
//!
//! Every check runs against the synth's parameter descriptors, so patches
//! and command-line overrides accept exactly what the engine exposes.
//!
//! # Example
//!
//! ```rust
//! use cadenza_config::parse_override;
//! use cadenza_synth::ParamId;
//!
//! let (id, value) = parse_override("delay_type=Normal").unwrap();
//! assert_eq!(id, ParamId::DelayType);
//! assert_eq!(value, 0.0);
//!
//! assert!(parse_override("amp_volume=4").is_err());
//! ```

use cadenza_core::ParamKind;
use cadenza_synth::ParamId;

use crate::error::ConfigError;

/// Resolve a parameter string id.
pub fn lookup_param(id: &str) -> Result<ParamId, ConfigError> {
    ParamId::from_string_id(id).ok_or_else(|| ConfigError::UnknownParameter(id.to_string()))
}

/// Check that `value` is finite, in range, and whole for discrete kinds.
pub fn validate_value(id: ParamId, value: f32) -> Result<(), ConfigError> {
    let desc = id.descriptor();
    if !value.is_finite() {
        return Err(ConfigError::invalid_value(desc.string_id, value, "not a finite number"));
    }
    if value < desc.min {
        return Err(ConfigError::invalid_value(
            desc.string_id,
            value,
            format!("below minimum {}", desc.min),
        ));
    }
    if value > desc.max {
        return Err(ConfigError::invalid_value(
            desc.string_id,
            value,
            format!("above maximum {}", desc.max),
        ));
    }
    if !matches!(desc.kind, ParamKind::Float) && value.fract() != 0.0 {
        return Err(ConfigError::invalid_value(
            desc.string_id,
            value,
            "must be a whole number",
        ));
    }
    Ok(())
}

/// Parse the text form of a value for `id`.
///
/// Toggles accept `true`/`false`, `on`/`off`, `yes`/`no`; choices accept
/// an option label (case-insensitive) or its index; everything else is a
/// number. The result is not range-checked.
pub fn parse_value(id: ParamId, text: &str) -> Result<f32, ConfigError> {
    let desc = id.descriptor();
    let text = text.trim();
    let lower = text.to_ascii_lowercase();

    match desc.kind {
        ParamKind::Bool => match lower.as_str() {
            "true" | "on" | "yes" => return Ok(1.0),
            "false" | "off" | "no" => return Ok(0.0),
            _ => {}
        },
        ParamKind::Choice(options) => {
            if let Some(index) = options.iter().position(|o| o.eq_ignore_ascii_case(text)) {
                return Ok(index as f32);
            }
        }
        ParamKind::Float | ParamKind::Int => {}
    }

    text.parse::<f32>().map_err(|_| {
        let expected = match desc.kind {
            ParamKind::Bool => String::from("expected on/off or a number"),
            ParamKind::Choice(options) => format!("expected one of: {}", options.join(", ")),
            ParamKind::Float | ParamKind::Int => String::from("expected a number"),
        };
        ConfigError::invalid_override(format!("{}={text}", desc.string_id), expected)
    })
}

/// Parse and validate an `id=value` override.
pub fn parse_override(spec: &str) -> Result<(ParamId, f32), ConfigError> {
    let (id, value) = spec
        .split_once('=')
        .ok_or_else(|| ConfigError::invalid_override(spec, "expected id=value"))?;
    let id = lookup_param(id.trim())?;
    let value = parse_value(id, value)?;
    validate_value(id, value)?;
    Ok((id, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        assert_eq!(lookup_param("filter_q").unwrap(), ParamId::FilterQ);
        assert!(matches!(
            lookup_param("filter_z"),
            Err(ConfigError::UnknownParameter(ref id)) if id == "filter_z"
        ));
    }

    #[test]
    fn test_range_checks() {
        assert!(validate_value(ParamId::FilterFreq, 20.0).is_ok());
        assert!(validate_value(ParamId::FilterFreq, 20000.0).is_ok());
        assert!(validate_value(ParamId::FilterFreq, 19.9).is_err());
        assert!(validate_value(ParamId::FilterFreq, f32::NAN).is_err());
        assert!(validate_value(ParamId::AmpEnvAttack, 0.0).is_err());
    }

    #[test]
    fn test_discrete_kinds_need_whole_numbers() {
        assert!(validate_value(ParamId::Osc1Octave, 1.0).is_ok());
        assert!(validate_value(ParamId::Osc1Octave, 1.5).is_err());
        assert!(validate_value(ParamId::NoiseOn, 0.5).is_err());
        assert!(validate_value(ParamId::LfoAppliesTo, 9.0).is_ok());
        assert!(validate_value(ParamId::LfoAppliesTo, 10.0).is_err());
    }

    #[test]
    fn test_parse_toggle_words() {
        assert_eq!(parse_value(ParamId::ReverbOn, "on").unwrap(), 1.0);
        assert_eq!(parse_value(ParamId::ReverbOn, "FALSE").unwrap(), 0.0);
        assert_eq!(parse_value(ParamId::ReverbOn, "1").unwrap(), 1.0);
        assert!(parse_value(ParamId::ReverbOn, "maybe").is_err());
    }

    #[test]
    fn test_parse_choice_labels() {
        assert_eq!(parse_value(ParamId::Osc1Type, "better sawtooth").unwrap(), 5.0);
        assert_eq!(parse_value(ParamId::FilterType, "High pass").unwrap(), 1.0);
        assert_eq!(parse_value(ParamId::FilterType, "0").unwrap(), 0.0);
        let err = parse_value(ParamId::FilterType, "band pass").unwrap_err();
        assert!(err.to_string().contains("Low pass"), "got: {err}");
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override(" filter_freq = 2400 ").unwrap(),
            (ParamId::FilterFreq, 2400.0)
        );
        assert!(matches!(
            parse_override("filter_freq"),
            Err(ConfigError::InvalidOverride { .. })
        ));
        assert!(matches!(
            parse_override("filter_freq=1e6"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_override("nope=1"),
            Err(ConfigError::UnknownParameter(_))
        ));
    }
}
