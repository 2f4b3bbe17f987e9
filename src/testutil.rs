//! Throwaway HTTP peers for the async tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, Once,
};

use axum::{
    extract::{Multipart, State},
    Router,
};

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::config::{self, Config};

static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static CAPTURE: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

/// Routes `log` records into memory for the rest of the test binary.
pub fn capture_logs() {
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE).ok();
        log::set_max_level(LevelFilter::Info);
    });
}

pub fn was_logged(level: Level, line: &str) -> bool {
    CAPTURED
        .lock()
        .unwrap()
        .iter()
        .any(|(l, msg)| *l == level && msg == line)
}

/// Binds `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}")
}

/// Config whose token, API and post endpoints all live under `base`.
pub fn test_config(base: &str) -> Config {
    let mut vars = config::tests::sample_vars();
    vars.insert("tokenUrl", format!("{base}/token"));
    vars.insert("postUrl", format!("{base}/post"));
    vars.insert("apiBaseUrl", format!("{base}/iot"));
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

#[derive(Clone, Default)]
pub struct Recorded {
    hits: Arc<AtomicUsize>,
    forms: Arc<Mutex<Vec<Vec<(String, String)>>>>,
}

impl Recorded {
    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn forms(&self) -> Vec<Vec<(String, String)>> {
        self.forms.lock().unwrap().clone()
    }
}

pub async fn record_form(State(recorded): State<Recorded>, mut multipart: Multipart) -> &'static str {
    recorded.hit();
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap();
        fields.push((name, value));
    }
    recorded.forms.lock().unwrap().push(fields);
    "ok"
}
