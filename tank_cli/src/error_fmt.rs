//! Human-readable error descriptions, exit codes and structured JSON errors.

use tank_core::error::{BuildError, MonitorError};
use tank_hardware::error::HwError;

/// Where in startup an error happened. Attached with `wrap_err`.
#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum Stage {
    #[error("configuration error")]
    Config,
    #[error("hardware initialization failed")]
    HardwareInit,
}

fn chain(err: &eyre::Report) -> String {
    err.chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    let detail = chain(err);

    if let Some(stage) = err.downcast_ref::<Stage>() {
        return match stage {
            Stage::Config => format!(
                "What happened: {detail}.\nLikely causes: Unreadable file, TOML syntax error, or out-of-range values.\nHow to fix: Edit the config file (see etc/tank_config.toml), then rerun."
            ),
            Stage::HardwareInit => format!(
                "What happened: {detail}.\nLikely causes: Incorrect pin numbers, SPI disabled, or insufficient GPIO permissions.\nHow to fix: Check the [pins] section; ensure the process may access /dev/gpiomem and /dev/spidev*."
            ),
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensors => {
                "What happened: The monitor was built without its sensors.\nLikely causes: Ranger or ADC channels failed to initialize.\nHow to fix: Pass all three inputs via with_sensors(...).".to_string()
            }
            BuildError::MissingIndicator => {
                "What happened: The monitor was built without the LED and buzzer.\nLikely causes: Output pins failed to initialize.\nHow to fix: Pass both outputs via with_indicator(...).".to_string()
            }
            BuildError::MissingDisplays => {
                "What happened: The monitor was built without its displays.\nLikely causes: Panel setup was skipped.\nHow to fix: Pass both panels via with_displays(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(hw) = err.downcast_ref::<HwError>() {
        return format!(
            "What happened: {hw}.\nLikely causes: Wiring, power, or permissions on the device.\nHow to fix: Verify the [pins] section and run `tank self-check`."
        );
    }

    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return format!(
            "What happened: {me}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    format!(
        "Something went wrong: {detail}\nHow to fix: Re-run with --log-level=debug for details."
    )
}

/// Stable exit codes: configuration 2, hardware initialization 3, anything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<Stage>() {
        Some(Stage::Config) => return 2,
        Some(Stage::HardwareInit) => return 3,
        None => {}
    }
    if matches!(err.downcast_ref::<BuildError>(), Some(BuildError::InvalidConfig(_))) {
        return 2;
    }
    if err.downcast_ref::<HwError>().is_some() {
        return 3;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match exit_code_for_error(err) {
        2 => "Config",
        3 => "HardwareInit",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "code": exit_code_for_error(err),
        "message": humanize(err),
        "detail": chain(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn config_stage_maps_to_exit_2() {
        let err: eyre::Report = Err::<(), _>(eyre::eyre!("timing.idle_ms must be >= 1"))
            .wrap_err(Stage::Config)
            .unwrap_err();
        assert_eq!(exit_code_for_error(&err), 2);
        let text = humanize(&err);
        assert!(text.contains("idle_ms"), "{text}");
    }

    #[test]
    fn hw_error_maps_to_exit_3() {
        let err = eyre::Report::new(HwError::Gpio("pin 23 busy".into()));
        assert_eq!(exit_code_for_error(&err), 3);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "HardwareInit");
        assert_eq!(v["code"], 3);
    }

    #[test]
    fn other_errors_map_to_exit_1() {
        let err = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&err), 1);
        assert!(humanize(&err).contains("boom"));
    }
}
