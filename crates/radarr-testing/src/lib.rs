//! Test doubles for code that depends on [`radarr_api::RadarrApi`].
//!
//! ```ignore
//! let fake = RadarrFake::new();
//! let movies = my_service(&fake).await?;
//! fake.assert_called("movies");
//! ```

pub mod factories;
pub mod fake;

pub use factories::{
    CommandFactory, DownloadFactory, HistoryFactory, MovieFactory, SystemStatusFactory,
};
pub use fake::{CallArgs, CallRecord, FakeResponse, RadarrFake};
