/// Color assigned to any team missing from the palette below. The lookup
/// is total: an unknown team gets gray, never an error.
pub const FALLBACK_TEAM_COLOR: &str = "#888888";

/// Hex color for a team name, keyed by the constructor names used in the
/// 2018 season exports.
pub fn team_color(team_name: &str) -> &'static str {
    match team_name {
        "Mercedes" => "#00D2BE",
        "Ferrari" => "#DC0000",
        "Red Bull" => "#1E41FF",
        "Renault" => "#FFF500",
        "Haas F1 Team" => "#BD9E57",
        "Force India" => "#F596C8",
        "Sauber" => "#006EFF",
        "McLaren" => "#FF8700",
        "Toro Rosso" => "#469BFF",
        "Williams" => "#37BEDD",
        "Toro Rosso Honda" => "#469BFF",
        "Alfa Romeo" => "#900000",
        _ => FALLBACK_TEAM_COLOR,
    }
}
