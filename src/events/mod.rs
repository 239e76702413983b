//! # Events Module
//!
//! Event-driven progress reporting for front ends that prefer push over
//! polling the result feed.
//!
//! ## Design
//! The core library emits events through channels, allowing any UI
//! (CLI, GUI, web) to subscribe and display progress.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Scan(ScanEvent::FileHashed { path }) = event {
//!             println!("hashed {}", path.display());
//!         }
//!     }
//! });
//!
//! let controller = ScanController::builder().events(sender).build();
//! controller.process(&base, "projects")?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
