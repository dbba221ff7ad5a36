//! Spacemarks RPC Server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"spaces.create", "caller":"auth|42", "params":{"id":"s1","name":"Work","order":0}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":{"code":"...","message":"..."}}
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spacemarks::app::App;
use spacemarks::rpc_handler::{handle_line, RpcResponse, TOO_MANY_REQUESTS};
use spacemarks::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Fixed-window rate limiter: max requests per one-second window.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn write_line(out: &mut impl Write, value: &impl serde::Serialize) -> io::Result<()> {
    let line = serde_json::to_string(value).map_err(io::Error::other)?;
    writeln!(out, "{}", line)?;
    out.flush()
}

fn main() -> ExitCode {
    let mut settings_engine = SettingsEngine::new(None);
    let settings = match settings_engine.load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to load settings from {}: {}", settings_engine.get_config_path(), e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings.log_filter);

    let app = match App::from_settings(settings_engine) {
        Ok(app) => Mutex::new(app),
        Err(e) => {
            error!(error = %e, "failed to initialize");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if write_line(&mut out, &ready).is_err() {
        return ExitCode::FAILURE;
    }
    info!(version = env!("CARGO_PKG_VERSION"), "ready");

    let mut rate_limiter = RateLimiter::new(settings.rate_limit_per_second);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, "failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = if rate_limiter.check() {
            handle_line(&app, &line)
        } else {
            let id = serde_json::from_str::<Value>(&line)
                .ok()
                .and_then(|v| v.get("id").cloned())
                .unwrap_or(Value::Null);
            RpcResponse::err(id, TOO_MANY_REQUESTS, "rate limit exceeded")
        };

        if let Err(e) = write_line(&mut out, &response) {
            error!(error = %e, "failed to write response");
            return ExitCode::FAILURE;
        }
    }

    info!("stdin closed, shutting down");
    ExitCode::SUCCESS
}
