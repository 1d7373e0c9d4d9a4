use crate::error::Result;
use crate::events::{MonitorInfo, WindowGeometry};
use crate::utils::run_session_command;

pub struct XrandrMonitors;

impl XrandrMonitors {
    pub fn new() -> Self {
        Self
    }

    pub fn list_monitors(&self) -> Result<Vec<MonitorInfo>> {
        let stdout = run_session_command("xrandr", &["--listmonitors"])?;
        Ok(parse_monitors(&stdout))
    }
}

/// Разбор `xrandr --listmonitors`:
///
/// ```text
/// Monitors: 2
///  0: +*DP-1 2560/597x1440/336+0+0  DP-1
///  1: +HDMI-1 1920/527x1080/296+2560+0  HDMI-1
/// ```
pub fn parse_monitors(stdout: &str) -> Vec<MonitorInfo> {
    stdout
        .lines()
        .skip_while(|line| line.starts_with("Monitors:"))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return None;
            }
            let index = parts[0].trim_end_matches(':').parse().ok()?;
            let geometry = parse_geometry(parts[2])?;
            let name = parts[1].trim_start_matches(['+', '*']).to_string();
            Some(MonitorInfo { index, name, geometry })
        })
        .collect()
}

/// `2560/597x1440/336+0+0` -> 2560x1440 в точке (0, 0)
fn parse_geometry(token: &str) -> Option<WindowGeometry> {
    let (width_part, rest) = token.split_once('x')?;
    let width = width_part.split('/').next()?.parse().ok()?;

    let mut fields = rest.split('+');
    let height = fields.next()?.split('/').next()?.parse().ok()?;
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;

    Some(WindowGeometry::new(x, y, width, height))
}
