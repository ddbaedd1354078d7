//! Client-side storefront core: role-gated session guards, derived catalog listings, REST
//! collection clients and checkout coupon math.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod guard;
pub mod listing;
pub mod obs;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		num::NonZeroUsize,
		pin::Pin,
		str::FromStr,
		sync::{Arc, Weak},
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use httpmock as _;
