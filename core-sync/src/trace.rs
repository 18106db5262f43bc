//! # Sync Trace
//!
//! Turns the progress events of a sync pass into the append-only text shown
//! while a station is synchronized.
//!
//! Events are rendered in the order they arrive. Every media player event
//! starts a new line, except upload ticks, which extend the current one.

use bridge_traits::progress::{
    ControllerSyncEvent, MediaPlayerSyncEvent, MediaStationSyncEvent, ProgressReporter,
    SyncProgressEvent,
};
use core_runtime::config::Language;
use std::sync::Mutex;

/// Texts of the sync and download screens for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTexts {
    pub start_sync: &'static str,
    pub nothing_to_sync: &'static str,
    pub connect_to_controller: &'static str,
    pub send_contents_json: &'static str,
    pub contents_json_sent: &'static str,
    pub sync_finished: &'static str,
    pub media_player_connecting_with: &'static str,
    pub media_player_connection_status: &'static str,
    pub media_player_load_media: &'static str,
    pub media_player_send_media: &'static str,
    pub media_player_send_media_success: &'static str,
    pub media_player_send_media_failed: &'static str,
    pub media_player_delete_media: &'static str,
    pub sync_failed: &'static str,
    pub last_sync_failed_retry: &'static str,
    /// Marker shown next to a station whose last sync failed
    pub last_sync_failed: &'static str,
    pub download_success: &'static str,
    pub download_no_contents: &'static str,
    pub download_no_controller_ip: &'static str,
    pub download_no_response: &'static str,
    pub download_other: &'static str,
}

impl SyncTexts {
    pub fn german() -> Self {
        Self {
            start_sync: "Starte Synchronisierung...",
            nothing_to_sync: "Medienstation ist auf dem aktuellen Stand.\n",
            connect_to_controller: "\nVerbinde mit Controller...",
            send_contents_json: "\nSende contents.json",
            contents_json_sent: "\nGesendet!",
            sync_finished: "\nSynchronisations-Prozess beendet.",
            media_player_connecting_with: "Verbinde mit: ",
            media_player_connection_status: "Verbindungsstatus: ",
            media_player_load_media: "Lade Medium: ",
            media_player_send_media: "Sende Medium",
            media_player_send_media_success: "OK",
            media_player_send_media_failed: "Fehlgeschlagen!",
            media_player_delete_media: "Lösche Medium mit ID: ",
            sync_failed: "Synchronisierung fehlgeschlagen.",
            last_sync_failed_retry:
                "Letzte Synchronisierung fehlgeschlagen. Versuche es erneut...\n",
            last_sync_failed: "[Letzte Synchronisierung fehlgeschlagen.]",
            download_success: "Die Inhalte wurden erfolgreich heruntergeladen.",
            download_no_contents: "Es sind noch keine Inhalte auf dem Controller.",
            download_no_controller_ip: "Es ist kein Controller definiert.",
            download_no_response: "Der Controller kann nicht erreicht werden: ",
            download_other: "Unbekannte Antwort.",
        }
    }

    pub fn english() -> Self {
        Self {
            start_sync: "Starting synchronization...",
            nothing_to_sync: "Media station is up to date.\n",
            connect_to_controller: "\nConnecting to controller...",
            send_contents_json: "\nSending contents.json",
            contents_json_sent: "\nSent!",
            sync_finished: "\nSynchronization finished.",
            media_player_connecting_with: "Connecting to: ",
            media_player_connection_status: "Connection status: ",
            media_player_load_media: "Loading media: ",
            media_player_send_media: "Sending media",
            media_player_send_media_success: "OK",
            media_player_send_media_failed: "Failed!",
            media_player_delete_media: "Deleting media with ID: ",
            sync_failed: "Synchronization failed.",
            last_sync_failed_retry: "Last synchronization failed. Retrying...\n",
            last_sync_failed: "[Last synchronization failed.]",
            download_success: "The contents were downloaded successfully.",
            download_no_contents: "There are no contents on the controller yet.",
            download_no_controller_ip: "No controller is defined.",
            download_no_response: "The controller cannot be reached: ",
            download_other: "Unknown response.",
        }
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::German => Self::german(),
            Language::English => Self::english(),
        }
    }
}

impl Default for SyncTexts {
    fn default() -> Self {
        Self::german()
    }
}

/// Text a single progress event adds to the trace.
pub fn render_event(texts: &SyncTexts, event: &SyncProgressEvent) -> String {
    match event {
        SyncProgressEvent::MediaStation(MediaStationSyncEvent::Done) => {
            texts.sync_finished.to_string()
        }
        SyncProgressEvent::Controller(event) => match event {
            ControllerSyncEvent::Connecting => texts.connect_to_controller,
            ControllerSyncEvent::SendingContents => texts.send_contents_json,
            ControllerSyncEvent::Sent => texts.contents_json_sent,
        }
        .to_string(),
        SyncProgressEvent::MediaPlayer(event) => render_media_player_event(texts, event),
    }
}

fn render_media_player_event(texts: &SyncTexts, event: &MediaPlayerSyncEvent) -> String {
    let line = match event {
        MediaPlayerSyncEvent::MediaSendingProgress { progress_point } => {
            return progress_point.clone();
        }
        MediaPlayerSyncEvent::Connecting { ip, app_name } => {
            format!("{}{}/{}", texts.media_player_connecting_with, ip, app_name)
        }
        MediaPlayerSyncEvent::ConnectionStatus { status } => {
            format!("{}{}", texts.media_player_connection_status, status)
        }
        MediaPlayerSyncEvent::LoadMediaStart { ext } => {
            format!("{}{}", texts.media_player_load_media, ext)
        }
        MediaPlayerSyncEvent::MediaSendStart => texts.media_player_send_media.to_string(),
        MediaPlayerSyncEvent::MediaSendSuccess => {
            texts.media_player_send_media_success.to_string()
        }
        MediaPlayerSyncEvent::MediaSendFailed => texts.media_player_send_media_failed.to_string(),
        MediaPlayerSyncEvent::DeleteStart { id } => {
            format!("{}{}", texts.media_player_delete_media, id)
        }
    };
    format!("\n{}", line)
}

/// Append-only trace of one sync pass.
///
/// Implements [`ProgressReporter`], so it can be handed to the client
/// directly.
#[derive(Debug)]
pub struct SyncTrace {
    texts: SyncTexts,
    text: Mutex<String>,
}

impl SyncTrace {
    pub fn new(texts: SyncTexts) -> Self {
        Self {
            texts,
            text: Mutex::new(String::new()),
        }
    }

    pub fn texts(&self) -> &SyncTexts {
        &self.texts
    }

    pub fn push_str(&self, text: &str) {
        self.text
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_str(text);
    }

    pub fn apply(&self, event: &SyncProgressEvent) {
        let rendered = render_event(&self.texts, event);
        self.push_str(&rendered);
    }

    pub fn snapshot(&self) -> String {
        self.text.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn into_string(self) -> String {
        self.text.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressReporter for SyncTrace {
    fn report(&self, event: SyncProgressEvent) {
        self.apply(&event);
    }
}
