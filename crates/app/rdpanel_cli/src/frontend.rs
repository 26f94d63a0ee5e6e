//! Terminal stand-ins for the dashboard's router and toast notifications.

use rdpanel_core::navigation::{Navigator, Route};
use rdpanel_core::notify::{Notice, NoticeLevel, Notifier};

/// Turns a forced return to the login view into a hint on stderr.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => eprintln!("Session expired. Log in again with `rdpanel login <username>`."),
            Route::Dashboard => log::debug!("navigate to {route}"),
        }
    }
}

/// Prints notices on stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error | NoticeLevel::Warning => eprintln!("! {}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => eprintln!("{}", notice.message),
        }
    }
}
