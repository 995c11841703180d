//! Static health tips and daily reminders

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthTip {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reminder {
    pub time: &'static str,
    pub message: &'static str,
}

pub const TIPS: &[HealthTip] = &[
    HealthTip {
        title: "Stay Hydrated",
        description: "Drink at least 8 glasses of water daily to maintain proper hydration.",
    },
    HealthTip {
        title: "Take Short Breaks",
        description: "For every 45 minutes of work, take a 5-minute break to rest your eyes and stretch.",
    },
    HealthTip {
        title: "Practice Deep Breathing",
        description: "Take 5 deep breaths when feeling stressed to help calm your nervous system.",
    },
    HealthTip {
        title: "Limit Screen Time",
        description: "Try to avoid screens at least 1 hour before bedtime for better sleep quality.",
    },
    HealthTip {
        title: "Get Moving",
        description: "Aim for at least 30 minutes of physical activity every day.",
    },
    HealthTip {
        title: "Eat More Vegetables",
        description: "Try to include vegetables in at least two meals daily for better nutrition.",
    },
];

pub const REMINDERS: &[Reminder] = &[
    Reminder { time: "8:00 AM", message: "Drink a glass of water" },
    Reminder { time: "10:00 AM", message: "Take a 5-minute stretch break" },
    Reminder { time: "12:30 PM", message: "Eat a balanced lunch" },
    Reminder { time: "3:00 PM", message: "Hydration reminder" },
    Reminder { time: "6:00 PM", message: "Time for a short walk" },
    Reminder { time: "9:00 PM", message: "Begin winding down for sleep" },
];
