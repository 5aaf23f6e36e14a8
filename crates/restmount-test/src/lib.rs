//! # Restmount Test
//!
//! Test utilities for Restmount servers. [`RecordingServer`] stands in for
//! the external web server: it records bindings, static mounts and
//! lifecycle calls, and dispatches requests to recorded handlers in memory.
//!
//! ## Example
//!
//! ```ignore
//! use restmount_server::{Server, ServerConfig};
//! use restmount_test::{RecordingServer, TestRequest};
//!
//! let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
//! server.register(UsersController);
//! server.start().unwrap();
//!
//! let response = server
//!     .web_server()
//!     .dispatch(TestRequest::get("/users/7").build().unwrap())
//!     .unwrap();
//! response.assert_status(http::StatusCode::OK);
//! ```

#![doc(html_root_url = "https://docs.rs/restmount-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod request;
mod response;
mod server;

pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
pub use server::{Binding, Listener, RecordingServer};
