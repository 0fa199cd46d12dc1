//! The browser UI shell.
//!
//! A small embedded HTTP server wires the page to the app core: `GET /`
//! renders the page, `GET /status` reports readiness, `POST /synthesize`
//! runs one submission through the pipeline, and `GET /audio/<name>` serves
//! WAV files produced by earlier successful conversions.
//!
//! Requests are handled one at a time off the server's sequential queue.
//! Agent initialization runs once on a background thread at startup; a
//! submission racing it simply observes the not-ready state.

pub mod page;

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use serde_json::json;
use tiny_http::{Header, Method, Request, Response, ResponseBox, Server, StatusCode};

use crate::app::{Conversion, SessionState, TtsApp, GENERATION_FAILED, NOT_READY_STATUS};

#[derive(thiserror::Error, Debug)]
pub enum WebAppError {
    #[error("Failed to bind HTTP server: {0}")]
    Bind(String),
}

/// The running web application: the app core plus the per-session state and
/// the registry of audio files cleared for serving.
pub struct WebApp {
    app: TtsApp,
    state: Mutex<SessionState>,
    served: Mutex<HashMap<String, PathBuf>>,
}

impl WebApp {
    pub fn new(app: TtsApp) -> Arc<Self> {
        Arc::new(Self {
            app,
            state: Mutex::new(SessionState::new()),
            served: Mutex::new(HashMap::new()),
        })
    }

    /// Bind `addr` and serve requests until the process exits.
    pub fn serve(self: Arc<Self>, addr: &str) -> Result<(), WebAppError> {
        let server = Server::http(addr).map_err(|e| WebAppError::Bind(e.to_string()))?;
        log::info!("{} listening on http://{}", self.app.title(), addr);

        self.spawn_init();

        for request in server.incoming_requests() {
            self.handle(request);
        }
        Ok(())
    }

    /// The page-load callback: build the agent once, off the request loop.
    fn spawn_init(self: &Arc<Self>) {
        let webapp = Arc::clone(self);
        thread::spawn(move || {
            log::info!(
                "initializing agent from {}",
                webapp.app.config_file().display()
            );
            match webapp.app.init_agent() {
                Ok(agent) => {
                    log::info!("agent '{}' ready", agent.name());
                    lock(&webapp.state).mark_ready(agent);
                }
                Err(e) => log::error!("agent initialization failed: {e}"),
            }
        });
    }

    fn handle(&self, mut request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = match route(&method, &url) {
            Route::Index => {
                let state = lock(&self.state);
                html_response(&page::render_index(
                    &self.app.title(),
                    page::EXAMPLE_TEXT,
                    state.status(),
                ))
            }
            Route::Status => {
                let state = lock(&self.state);
                json_response(
                    200,
                    json!({"initialized": state.is_ready(), "message": state.status()}).to_string(),
                )
            }
            Route::Synthesize => {
                let mut body = String::new();
                match request.as_reader().read_to_string(&mut body) {
                    Ok(_) => {
                        let (code, payload) = self.synthesize(&body);
                        json_response(code, payload)
                    }
                    Err(e) => json_response(
                        400,
                        json!({"error": format!("Unreadable request body: {e}")}).to_string(),
                    ),
                }
            }
            Route::Audio(name) => self.audio_response(name),
            Route::NotFound => json_response(404, json!({"error": "Not found"}).to_string()),
        };

        if let Err(e) = request.respond(response) {
            log::warn!("failed to send response: {e}");
        }
    }

    /// Handle one submission. Returns the HTTP status and JSON payload.
    fn synthesize(&self, body: &str) -> (u16, String) {
        let form = parse_form(body);
        let Some(text) = form.get("text") else {
            return (400, json!({"error": "Missing 'text' field"}).to_string());
        };

        let mut state = lock(&self.state);
        match self.app.text_to_speech(&mut state, text) {
            Ok(Conversion::NotReady) => (
                200,
                json!({"audio_url": null, "message": NOT_READY_STATUS}).to_string(),
            ),
            Ok(Conversion::Audio(path)) => match self.register_audio(&path) {
                Some(url) => (200, json!({"audio_url": url, "message": null}).to_string()),
                None => (500, json!({"error": GENERATION_FAILED}).to_string()),
            },
            Ok(Conversion::Failed) => (500, json!({"error": GENERATION_FAILED}).to_string()),
            Err(e) => (500, json!({"error": e.to_string()}).to_string()),
        }
    }

    /// Clear a generated file for serving and return its URL.
    ///
    /// Only registered names are ever served, so the shell never exposes
    /// arbitrary filesystem paths.
    fn register_audio(&self, path: &str) -> Option<String> {
        let name = Path::new(path).file_name()?.to_str()?.to_string();
        lock(&self.served).insert(name.clone(), PathBuf::from(path));
        Some(format!("/audio/{}", urlencoding::encode(&name)))
    }

    fn audio_file(&self, encoded: &str) -> Option<PathBuf> {
        let name = urlencoding::decode(encoded).ok()?;
        lock(&self.served).get(name.as_ref()).cloned()
    }

    fn audio_response(&self, encoded: &str) -> ResponseBox {
        let Some(path) = self.audio_file(encoded) else {
            return json_response(404, json!({"error": "Unknown audio file"}).to_string());
        };
        match File::open(&path) {
            Ok(file) => Response::from_file(file)
                .with_header(content_type("audio/wav"))
                .boxed(),
            Err(e) => {
                log::warn!("cannot open {}: {e}", path.display());
                json_response(404, json!({"error": "Audio file unavailable"}).to_string())
            }
        }
    }
}

/// Build a web app around `app` and serve it on `addr`.
pub fn serve(app: TtsApp, addr: &str) -> Result<(), WebAppError> {
    WebApp::new(app).serve(addr)
}

#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    Index,
    Status,
    Synthesize,
    Audio(&'a str),
    NotFound,
}

fn route<'a>(method: &Method, url: &'a str) -> Route<'a> {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Get, "/") => Route::Index,
        (Method::Get, "/status") => Route::Status,
        (Method::Post, "/synthesize") => Route::Synthesize,
        (Method::Get, _) if path.starts_with("/audio/") => {
            Route::Audio(&path["/audio/".len()..])
        }
        _ => Route::NotFound,
    }
}

/// Parse an `application/x-www-form-urlencoded` body.
fn parse_form(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next().unwrap_or("");
            Some((
                urlencoding::decode(key).ok()?.into_owned(),
                urlencoding::decode(value).ok()?.into_owned(),
            ))
        })
        .collect()
}

/// Recover from a poisoned lock; state stays usable for the serving path.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn content_type(value: &str) -> Header {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).unwrap()
}

fn html_response(body: &str) -> ResponseBox {
    Response::from_string(body)
        .with_header(content_type("text/html; charset=utf-8"))
        .boxed()
}

fn json_response(code: u16, body: String) -> ResponseBox {
    Response::from_string(body)
        .with_status_code(StatusCode(code))
        .with_header(content_type("application/json"))
        .boxed()
}
