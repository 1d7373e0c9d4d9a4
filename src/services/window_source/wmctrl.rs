use crate::error::Result;
use crate::events::{WindowGeometry, WindowId, WindowInfo};
use crate::utils::run_session_command;

pub struct WmctrlLister;

impl WmctrlLister {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        run_session_command("wmctrl", &["-m"]).map(|_| ())
    }

    /// Все управляемые окна с геометрией
    pub fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        let stdout = run_session_command("wmctrl", &["-lG"])?;
        Ok(parse_window_list(&stdout))
    }
}

/// Разбор вывода `wmctrl -lG`: `id desktop x y w h host title...`
pub fn parse_window_list(stdout: &str) -> Vec<WindowInfo> {
    stdout.lines().filter_map(parse_window_line).collect()
}

fn parse_window_line(line: &str) -> Option<WindowInfo> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 7 {
        return None;
    }

    let id = u64::from_str_radix(parts[0].trim_start_matches("0x"), 16).ok()?;
    let x = parts[2].parse().ok()?;
    let y = parts[3].parse().ok()?;
    let width = parts[4].parse().ok()?;
    let height = parts[5].parse().ok()?;
    let title = parts.get(7..).map(|rest| rest.join(" ")).unwrap_or_default();

    Some(WindowInfo::new(WindowId(id), title).with_geometry(WindowGeometry::new(x, y, width, height)))
}
