use crate::error::Result;
use crate::events::WindowId;
use crate::utils::run_session_command;

/// Свойства окна, которых нет в выводе wmctrl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowProperties {
    pub gtk_application_id: Option<String>,
    pub wm_class: Option<String>,
    pub fullscreen: bool,
}

pub struct XpropReader;

impl XpropReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, window: WindowId) -> Result<WindowProperties> {
        let id = format!("0x{:x}", window.0);
        let stdout = run_session_command(
            "xprop",
            &["-id", &id, "_GTK_APPLICATION_ID", "WM_CLASS", "_NET_WM_STATE"],
        )?;
        Ok(parse_properties(&stdout))
    }
}

pub fn parse_properties(stdout: &str) -> WindowProperties {
    let mut props = WindowProperties::default();

    for line in stdout.lines() {
        let Some((name, value)) = line.split_once(" = ") else {
            // "_GTK_APPLICATION_ID:  not found." и пустые значения
            continue;
        };

        if name.starts_with("_GTK_APPLICATION_ID") {
            props.gtk_application_id = quoted_values(value).into_iter().next();
        } else if name.starts_with("WM_CLASS") {
            // WM_CLASS = "instance", "Class"
            props.wm_class = quoted_values(value).into_iter().last();
        } else if name.starts_with("_NET_WM_STATE") {
            props.fullscreen = value
                .split(',')
                .any(|atom| atom.trim() == "_NET_WM_STATE_FULLSCREEN");
        }
    }

    props
}

fn quoted_values(value: &str) -> Vec<String> {
    value
        .split('"')
        .skip(1)
        .step_by(2)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
