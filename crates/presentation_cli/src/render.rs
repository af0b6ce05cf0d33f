//! Plain-text rendering of dashboard state

use application::{ApplicationError, LocationOutcome, RefreshReport, RefreshStatus, UserOutcome};
use domain::{Location, LocationWeatherView, PlaceCandidate};

/// One numbered line per tracked location
pub fn location_line(index: usize, location: &Location) -> String {
    let marker = if location.is_current_position { " 📍" } else { "" };
    format!(
        "{}. {}{marker}  [{}]",
        index + 1,
        location.display_name,
        location.id
    )
}

/// Current conditions followed by one line per forecast day
pub fn view_block(view: &LocationWeatherView) -> Vec<String> {
    let mut lines = vec![format!(
        "   now {}°, {} (feels like {})",
        view.current_temperature(),
        view.current.condition_text,
        view.current
            .feels_like
            .map_or_else(|| "n/a".to_string(), |t| format!("{}°", t.round())),
    )];

    let mut details = Vec::new();
    if let Some(humidity) = view.current.humidity {
        details.push(format!("humidity {humidity}%"));
    }
    if let Some(wind) = view.current.wind_speed {
        details.push(format!("wind {wind:.1}"));
    }
    if let Some(pressure) = view.current.pressure {
        details.push(format!("pressure {pressure:.0} hPa"));
    }
    if !details.is_empty() {
        lines.push(format!("   {}", details.join(", ")));
    }

    lines.extend(view.forecast.iter().map(|day| format!("   {}", day.summary())));
    lines.push(format!(
        "   updated {}",
        view.fetched_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines
}

/// Location header plus its view or failure reason
pub fn outcome_block(index: usize, outcome: &LocationOutcome) -> Vec<String> {
    let mut lines = vec![location_line(index, outcome.location())];
    if let Some(view) = outcome.view() {
        lines.extend(view_block(view));
    }
    match outcome {
        LocationOutcome::Fresh(_) => {},
        LocationOutcome::Stale { error, .. } => {
            lines.push(format!("   ⚠️  showing cached data: {error}"));
        },
        LocationOutcome::Unavailable { error, .. } => {
            lines.push(format!("   ❌ {}", error_line(error)));
        },
    }
    lines
}

/// Overall status line of a refresh
pub const fn status_line(report: &RefreshReport) -> &'static str {
    match report.status {
        RefreshStatus::Empty => "No locations tracked yet. Add one with `skydeck-cli add <city>`.",
        RefreshStatus::Complete => "All locations updated.",
        RefreshStatus::Partial => "Some locations could not be updated.",
        RefreshStatus::StaleOnly => "Offline: showing cached weather.",
        RefreshStatus::Failed => "Failed to load weather data.",
    }
}

/// Every line of a refresh report
pub fn report_lines(report: &RefreshReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .enumerate()
        .flat_map(|(i, outcome)| outcome_block(i, outcome))
        .collect();
    lines.push(status_line(report).to_string());
    lines
}

/// Numbered suggestion list
pub fn suggestion_lines(candidates: &[PlaceCandidate]) -> Vec<String> {
    if candidates.is_empty() {
        return vec![UserOutcome::NotFound.message().to_string()];
    }
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c.display_name()))
        .collect()
}

/// User-facing message for an error with its detail
pub fn error_line(error: &ApplicationError) -> String {
    format!("{}: {error}", error.outcome().message())
}
