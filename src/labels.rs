//! Human-readable names for priorities, statuses and filters
//!
//! The model only knows its enum variants; display strings live here, keyed
//! by [`Locale`], so presentation can change without touching domain logic.

use std::str::FromStr;

use crate::filter::TaskFilter;
use crate::model::{Priority, TaskStatus};

/// Display language for labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    Arabic,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "ar" | "arabic" => Ok(Locale::Arabic),
            _ => Err(format!("Unknown locale '{}'. Valid locales: en, ar", s)),
        }
    }
}

const PRIORITY_LABELS: [(Priority, &str, &str); 3] = [
    (Priority::High, "High", "عالية"),
    (Priority::Medium, "Medium", "متوسطة"),
    (Priority::Low, "Low", "منخفضة"),
];

const STATUS_LABELS: [(TaskStatus, &str, &str); 3] = [
    (TaskStatus::New, "New", "جديدة"),
    (TaskStatus::InProgress, "In progress", "قيد التنفيذ"),
    (TaskStatus::Completed, "Completed", "منجزة"),
];

const FILTER_LABELS: [(TaskFilter, &str, &str); 5] = [
    (TaskFilter::All, "All", "الكل"),
    (TaskFilter::Completed, "Completed", "المنجزة"),
    (TaskFilter::InProgress, "In progress", "قيد التنفيذ"),
    (TaskFilter::HighPriority, "High priority", "عالية الأولوية"),
    (TaskFilter::Overdue, "Overdue", "المتأخرة"),
];

fn pick<K: PartialEq>(
    table: &[(K, &'static str, &'static str)],
    key: K,
    locale: Locale,
) -> &'static str {
    table
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, en, ar)| match locale {
            Locale::English => *en,
            Locale::Arabic => *ar,
        })
        .unwrap_or("?")
}

pub fn priority_label(priority: Priority, locale: Locale) -> &'static str {
    pick(&PRIORITY_LABELS, priority, locale)
}

pub fn status_label(status: TaskStatus, locale: Locale) -> &'static str {
    pick(&STATUS_LABELS, status, locale)
}

pub fn filter_label(filter: TaskFilter, locale: Locale) -> &'static str {
    pick(&FILTER_LABELS, filter, locale)
}
