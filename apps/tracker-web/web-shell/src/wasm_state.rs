use serde::Serialize;

/// Boot and interaction record exported through `boot_diagnostics_json`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ShellDiagnostics {
    pub(crate) phase: String,
    pub(crate) detail: String,
    pub(crate) page: Option<String>,
    pub(crate) api_base_url: Option<String>,
    pub(crate) boot_started_at_unix_ms: Option<u64>,
    pub(crate) boot_total_latency_ms: Option<u64>,
    pub(crate) activation: Option<String>,
    pub(crate) active_view: Option<String>,
    pub(crate) handlers_installed: usize,
    pub(crate) action_total: u64,
    pub(crate) action_failures: u64,
    pub(crate) last_action: Option<String>,
    pub(crate) last_error: Option<String>,
}

impl Default for ShellDiagnostics {
    fn default() -> Self {
        Self {
            phase: "idle".to_string(),
            detail: "web shell not started".to_string(),
            page: None,
            api_base_url: None,
            boot_started_at_unix_ms: None,
            boot_total_latency_ms: None,
            activation: None,
            active_view: None,
            handlers_installed: 0,
            action_total: 0,
            action_failures: 0,
            last_action: None,
            last_error: None,
        }
    }
}

impl ShellDiagnostics {
    pub(crate) fn set_phase(&mut self, phase: &str, detail: &str) {
        self.phase = phase.to_string();
        self.detail = detail.to_string();
        if phase != "error" {
            self.last_error = None;
        }
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.phase = "error".to_string();
        self.detail = "startup failed".to_string();
        self.last_error = Some(message.to_string());
    }

    pub(crate) fn record_action(&mut self, action: &str, error: Option<String>) {
        self.action_total = self.action_total.saturating_add(1);
        self.last_action = Some(action.to_string());
        if let Some(error) = error {
            self.action_failures = self.action_failures.saturating_add(1);
            self.last_error = Some(format!("{action}: {error}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_clear_stale_errors() {
        let mut diagnostics = ShellDiagnostics::default();
        diagnostics.fail("window is unavailable");
        assert_eq!(diagnostics.phase, "error");
        assert!(diagnostics.last_error.is_some());

        diagnostics.set_phase("ready", "dashboard active");
        assert_eq!(diagnostics.last_error, None);
    }

    #[test]
    fn actions_count_failures() {
        let mut diagnostics = ShellDiagnostics::default();
        diagnostics.record_action("toggle_feed", None);
        diagnostics.record_action("connect", Some("network".to_string()));
        assert_eq!(diagnostics.action_total, 2);
        assert_eq!(diagnostics.action_failures, 1);
        assert_eq!(diagnostics.last_error.as_deref(), Some("connect: network"));
        assert_eq!(diagnostics.last_action.as_deref(), Some("connect"));
    }

    #[test]
    fn serializes_for_the_console() {
        let json = serde_json::to_value(ShellDiagnostics::default()).unwrap_or_default();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["handlers_installed"], 0);
    }
}
