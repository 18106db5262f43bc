//! User-facing labels produced by the library components.

use bridge_traits::connection::ConnectionStep;
use bridge_traits::types::LightIntensity;
use core_runtime::config::Language;

/// Labels for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryTexts {
    pub light_low: &'static str,
    pub light_medium: &'static str,
    pub light_high: &'static str,
    pub search_results: &'static str,
    /// Contains a `{name}` placeholder for the folder name
    pub search_results_in_folder: &'static str,
    pub check_connection_to: &'static str,
    pub check_ping: &'static str,
    pub check_tcp: &'static str,
    pub check_ws_ping: &'static str,
    pub check_registration: &'static str,
    pub step_ok: &'static str,
    pub step_failed: &'static str,
}

impl LibraryTexts {
    pub fn german() -> Self {
        Self {
            light_low: "Niedrig",
            light_medium: "Mittel",
            light_high: "Hoch",
            search_results: "Suchergebnisse: ",
            search_results_in_folder: "Suchergebnisse im Ordner \"{name}\": ",
            check_connection_to: "Überprüfe Verbindung zu: ",
            check_ping: "\nMedien Player wird angepingt... ",
            check_tcp: "\nBaue Verbindung zum Medien Player auf... ",
            check_ws_ping: "\nSende Test-Kommando zum Medien Player... ",
            check_registration: "\nÜberprüfe ob Registrierung möglich ist... ",
            step_ok: "OK",
            step_failed: "Fehlgeschlagen!",
        }
    }

    pub fn english() -> Self {
        Self {
            light_low: "Low",
            light_medium: "Medium",
            light_high: "High",
            search_results: "Search results: ",
            search_results_in_folder: "Search results in folder \"{name}\": ",
            check_connection_to: "Checking connection to: ",
            check_ping: "\nPinging media player... ",
            check_tcp: "\nOpening connection to media player... ",
            check_ws_ping: "\nSending test command to media player... ",
            check_registration: "\nChecking whether registration is possible... ",
            step_ok: "OK",
            step_failed: "Failed!",
        }
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::German => Self::german(),
            Language::English => Self::english(),
        }
    }

    pub fn light_intensity(&self, intensity: LightIntensity) -> &'static str {
        match intensity {
            LightIntensity::Low => self.light_low,
            LightIntensity::Medium => self.light_medium,
            LightIntensity::High => self.light_high,
        }
    }

    pub fn search_results_in(&self, folder_name: &str) -> String {
        self.search_results_in_folder.replace("{name}", folder_name)
    }

    pub fn connection_step(&self, step: ConnectionStep) -> &'static str {
        match step {
            ConnectionStep::IcmpPing => self.check_ping,
            ConnectionStep::TcpConnect => self.check_tcp,
            ConnectionStep::WebSocketPing => self.check_ws_ping,
            ConnectionStep::Registration => self.check_registration,
        }
    }
}

impl Default for LibraryTexts {
    fn default() -> Self {
        Self::german()
    }
}
