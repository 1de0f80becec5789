use clap::ValueEnum;

/// The screen currently on display. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    Dashboard,
    #[default]
    Customers,
}

/// Sidebar actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ShowDashboard,
    ShowCustomers,
}

impl View {
    pub const ALL: [View; 2] = [View::Dashboard, View::Customers];

    pub fn navigate(self, navigation: Navigation) -> View {
        match navigation {
            Navigation::ShowDashboard => View::Dashboard,
            Navigation::ShowCustomers => View::Customers,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "DASHBOARD",
            View::Customers => "CLIENTS DB",
        }
    }

    pub fn hotkey(&self) -> char {
        match self {
            View::Dashboard => '1',
            View::Customers => '2',
        }
    }
}
