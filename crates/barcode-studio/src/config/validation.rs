//! Per-key validation of setting values.

/// Validate a value for the given key before it reaches the DB.
///
/// Empty values are always accepted: they mean "revert to default".
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    match key {
        "zebra.endpoint" => validate_url(value),
        "graphic.import-mode" => validate_import_mode(value),
        "notice.duration-ms" => validate_number::<u64>(value, "milliseconds"),
        "canvas.container-gap" => validate_number::<f32>(value, "canvas units"),
        _ => Ok(()),
    }
}

fn validate_url(value: &str) -> Result<(), String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("not an http(s) URL: {value}"))
    }
}

fn validate_import_mode(value: &str) -> Result<(), String> {
    match value {
        "vector" | "raster" => Ok(()),
        other => Err(format!("expected 'vector' or 'raster', got '{other}'")),
    }
}

fn validate_number<T: std::str::FromStr>(value: &str, unit: &str) -> Result<(), String> {
    value
        .parse::<T>()
        .map(|_| ())
        .map_err(|_| format!("not a valid number of {unit}: {value}"))
}
