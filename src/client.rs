//! Typed client for the Spacemarks contract.
//!
//! [`RpcClient::call`] takes a [`Procedure`] marker, so the input and output
//! types are checked at compile time:
//!
//! ```no_run
//! use std::sync::Mutex;
//! use spacemarks::app::App;
//! use spacemarks::client::{InProcessTransport, RpcClient};
//! use spacemarks::contract::{spaces, sync, NoInput};
//!
//! let app = Mutex::new(App::open_in_memory().unwrap());
//! let mut client = RpcClient::new(InProcessTransport::new(&app), "auth|42");
//! client.call::<sync::EnsureUser>(&Default::default()).unwrap();
//! let all = client.call::<spaces::List>(&NoInput {}).unwrap();
//! assert!(all.is_empty());
//! ```

use std::io::{BufRead, Write};
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use crate::app::App;
use crate::contract::Procedure;
use crate::rpc_handler::{handle_request, RpcRequest, RpcResponse, PARSE_ERROR, TOO_MANY_REQUESTS};
use crate::types::errors::{ClientError, ContractError};

/// Delivers one request and returns its response.
pub trait Transport {
    fn send(&mut self, request: &RpcRequest) -> Result<RpcResponse, ClientError>;
}

/// Calls the handler directly on a shared app.
pub struct InProcessTransport<'a> {
    app: &'a Mutex<App>,
}

impl<'a> InProcessTransport<'a> {
    pub fn new(app: &'a Mutex<App>) -> Self {
        Self { app }
    }
}

impl<'a> Transport for InProcessTransport<'a> {
    fn send(&mut self, request: &RpcRequest) -> Result<RpcResponse, ClientError> {
        Ok(handle_request(self.app, request))
    }
}

/// Newline-delimited JSON over any reader/writer pair, e.g. a child
/// `spacemarks-rpc` process's stdout/stdin.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Transport for LineTransport<R, W> {
    fn send(&mut self, request: &RpcRequest) -> Result<RpcResponse, ClientError> {
        let line = serde_json::to_string(request)?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;

        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Err(ClientError::Malformed("connection closed".to_string()));
            }
            let value: Value = match buf.trim() {
                "" => continue,
                text => serde_json::from_str(text)?,
            };
            // Lifecycle events such as {"event":"ready"} are not responses
            if value.get("event").is_some() {
                continue;
            }
            return Ok(serde_json::from_value(value)?);
        }
    }
}

/// Client bound to one caller identity.
pub struct RpcClient<T> {
    transport: T,
    caller: String,
    next_id: u64,
}

impl<T: Transport> RpcClient<T> {
    pub fn new(transport: T, caller: impl Into<String>) -> Self {
        Self {
            transport,
            caller: caller.into(),
            next_id: 1,
        }
    }

    /// Invokes procedure `P` and decodes its output.
    pub fn call<P: Procedure>(&mut self, input: &P::Input) -> Result<P::Output, ClientError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = RpcRequest {
            id: Value::from(id),
            method: P::PATH.to_string(),
            kind: Some(P::KIND),
            caller: Some(self.caller.clone()),
            params: serde_json::to_value(input)?,
        };
        debug!(id, method = P::PATH, "sending request");
        let response = self.transport.send(&request)?;

        if response.id != request.id {
            return Err(ClientError::Malformed(format!(
                "response id {} does not match request id {}",
                response.id, request.id
            )));
        }
        match (response.result, response.error) {
            (_, Some(err)) if err.code == PARSE_ERROR || err.code == TOO_MANY_REQUESTS => {
                Err(ClientError::Rejected {
                    code: err.code,
                    message: err.message,
                })
            }
            (_, Some(err)) => Err(ContractError::from_code(&err.code, err.message).into()),
            (Some(result), None) => Ok(serde_json::from_value(result)?),
            (None, None) => Err(ClientError::Malformed(
                "response has neither result nor error".to_string(),
            )),
        }
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}
