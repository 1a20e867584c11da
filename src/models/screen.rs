/// The destinations on the bottom toolbar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Add,
    Stats,
    Budgets,
    Bills,
    Income,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Home,
        Screen::Add,
        Screen::Stats,
        Screen::Budgets,
        Screen::Bills,
        Screen::Income,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Add => "Add",
            Screen::Stats => "Stats",
            Screen::Budgets => "Budgets",
            Screen::Bills => "Bills",
            Screen::Income => "Income",
        }
    }

    /// Looks a destination up by its toolbar label, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|screen| screen.label().eq_ignore_ascii_case(name))
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&screen| screen == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_resolves_to_its_screen() {
        for screen in Screen::ALL {
            assert_eq!(Screen::from_name(screen.label()), Some(screen));
        }
        assert_eq!(Screen::from_name("budgets"), Some(Screen::Budgets));
        assert_eq!(Screen::from_name("Reports"), None);
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(Screen::Income.next(), Screen::Home);
        assert_eq!(Screen::Home.prev(), Screen::Income);
        assert_eq!(Screen::Add.next(), Screen::Stats);
    }
}
