#![cfg_attr(test, allow(clippy::expect_used))]

pub mod address;
pub mod config;
pub mod dashboard;
pub mod entry;
pub mod error;
pub mod feed;
pub mod gate;
pub mod http;
pub mod port;
pub mod profile;
pub mod router;
pub mod session;
pub mod store;
pub mod top_tracks;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, ConfigError, StorageKeys};
pub use dashboard::{Activation, Dashboard, ViewLoad};
pub use entry::{EntryOutcome, EntryPage};
pub use error::{ClientError, ErrorKind, Field};
pub use feed::{FeedCaption, FeedEntry, FeedOutcome, FeedRow, FeedSnapshot};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use port::{AddressBar, FeedbackPort, ViewPort};
pub use profile::{Avatar, ProfileCard};
pub use router::{ViewData, ViewDescriptor};
pub use store::{KeyValueStorage, Session, StorageError};
pub use top_tracks::{TopTrackCard, TopTracksView};
