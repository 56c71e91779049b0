//! Sidebar shell: static navigation data and the right panel's drag resizer.

pub const MIN_WIDTH: i32 = 250;
pub const MAX_WIDTH: i32 = 600;
pub const DEFAULT_WIDTH: i32 = 288;

/// Width of a right-anchored panel whose left edge follows the pointer.
pub fn resized_width(body_width: i32, pointer_x: i32) -> i32 {
    (body_width - pointer_x).clamp(MIN_WIDTH, MAX_WIDTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeState {
    pub width: i32,
    pub resizing: bool,
}

impl Default for ResizeState {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            resizing: false,
        }
    }
}

impl ResizeState {
    pub fn start(&mut self) {
        self.resizing = true;
    }

    /// Pointer moved; ignored unless a drag is in progress.
    pub fn drag(&mut self, body_width: i32, pointer_x: i32) {
        if self.resizing {
            self.width = resized_width(body_width, pointer_x);
        }
    }

    pub fn stop(&mut self) {
        self.resizing = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub title: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
    pub active: bool,
    pub badge: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPage {
    pub name: &'static str,
    pub emoji: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup {
    pub name: &'static str,
    pub emoji: &'static str,
    pub pages: Vec<NavPage>,
}

pub fn main_nav() -> Vec<NavItem> {
    vec![
        NavItem {
            title: "Search",
            icon: "🔍",
            url: "#",
            active: false,
            badge: None,
        },
        NavItem {
            title: "Ask AI",
            icon: "✨",
            url: "#",
            active: false,
            badge: None,
        },
        NavItem {
            title: "Home",
            icon: "🏠",
            url: "#",
            active: true,
            badge: None,
        },
        NavItem {
            title: "Inbox",
            icon: "📥",
            url: "#",
            active: false,
            badge: Some("10"),
        },
    ]
}

pub fn favorites() -> Vec<NavPage> {
    vec![
        NavPage {
            name: "Project Management & Task Tracking",
            emoji: "📊",
            url: "#",
        },
        NavPage {
            name: "Family Recipe Collection & Meal Planning",
            emoji: "🍳",
            url: "#",
        },
        NavPage {
            name: "Fitness Tracker & Workout Routines",
            emoji: "💪",
            url: "#",
        },
        NavPage {
            name: "Book Notes & Reading List",
            emoji: "📚",
            url: "#",
        },
    ]
}

pub fn workspace_groups() -> Vec<NavGroup> {
    vec![
        NavGroup {
            name: "Personal Life Management",
            emoji: "🏠",
            pages: vec![
                NavPage {
                    name: "Daily Journal & Reflection",
                    emoji: "📔",
                    url: "#",
                },
                NavPage {
                    name: "Health & Wellness Tracker",
                    emoji: "🍏",
                    url: "#",
                },
                NavPage {
                    name: "Personal Growth & Learning Goals",
                    emoji: "🌟",
                    url: "#",
                },
            ],
        },
        NavGroup {
            name: "Professional Development",
            emoji: "💼",
            pages: vec![
                NavPage {
                    name: "Career Objectives & Milestones",
                    emoji: "🎯",
                    url: "#",
                },
                NavPage {
                    name: "Skill Acquisition & Training Log",
                    emoji: "🧠",
                    url: "#",
                },
                NavPage {
                    name: "Networking Contacts & Events",
                    emoji: "🤝",
                    url: "#",
                },
            ],
        },
        NavGroup {
            name: "Home Management",
            emoji: "🏡",
            pages: vec![
                NavPage {
                    name: "Household Budget & Expense Tracking",
                    emoji: "💰",
                    url: "#",
                },
                NavPage {
                    name: "Home Maintenance Schedule & Tasks",
                    emoji: "🔧",
                    url: "#",
                },
                NavPage {
                    name: "Family Calendar & Event Planning",
                    emoji: "📅",
                    url: "#",
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_clamped() {
        assert_eq!(resized_width(1440, 1440 - 300), 300);
        assert_eq!(resized_width(1440, 1400), MIN_WIDTH);
        assert_eq!(resized_width(1440, 10), MAX_WIDTH);
    }

    #[test]
    fn drag_only_while_resizing() {
        let mut state = ResizeState::default();
        state.drag(1000, 500);
        assert_eq!(state.width, DEFAULT_WIDTH);
        state.start();
        state.drag(1000, 600);
        assert_eq!(state.width, 400);
        state.stop();
        state.drag(1000, 900);
        assert_eq!(state.width, 400);
    }

    #[test]
    fn exactly_one_active_nav_item() {
        assert_eq!(main_nav().iter().filter(|i| i.active).count(), 1);
    }
}
