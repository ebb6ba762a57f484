//! Client-side state that sits next to `enrolly-api`.
//!
//! - **[`Session`]**: the only writer of the persisted auth token
//!   (login / logout). Everything else reads it through the
//!   [`SessionStore`](enrolly_api::SessionStore).
//!
//! - **[`NavigationGuard`]**: decides, on every route change, whether the
//!   target view is reachable or the user is sent to the login view.
//!
//! - **[`QuerySequencer`]** / **[`ListView`]**: per-query sequence numbers
//!   so a late response for an older request never replaces a newer one.

pub mod guard;
pub mod sequence;
pub mod session;
pub mod view;

pub use guard::{AuthState, LOGIN_PATH, Navigation, NavigationGuard};
pub use sequence::{QuerySequencer, QueryTicket};
pub use session::Session;
pub use view::ListView;
