//! Motivational quote tables.

use rand::seq::IndexedRandom;

use crate::types::TaskType;

/// Quotes used when no incomplete task tells us what the student is doing.
pub const GENERAL_QUOTES: [&str; 10] = [
    "You've got this! Just a little more focus! 💪",
    "Take a deep breath, stay strong! 🌟",
    "Remember why you started! 🎯",
    "Your future self will thank you! 🚀",
    "Small steps lead to big achievements! 🎓",
    "Stay focused, stay amazing! ✨",
    "You're doing great! Keep pushing! 🌈",
    "Success is built one study session at a time! 📚",
    "Believe in yourself! You can do this! ⭐",
    "Every minute of focus counts! 🎯",
];

/// Quotes tailored to a kind of study work.
#[must_use]
pub fn for_task_type(task_type: TaskType) -> &'static [&'static str] {
    match task_type {
        TaskType::Reading => &[
            "Take it one page at a time! 📚",
            "Every paragraph brings new knowledge! 🎯",
            "Reading is to the mind what exercise is to the body! 💪",
        ],
        TaskType::Writing => &[
            "Let your ideas flow freely! ✍️",
            "Your words have power! 🌟",
            "Write first, edit later! 📝",
        ],
        TaskType::ProblemSolving => &[
            "Break it down, solve it up! 🧩",
            "Every problem is a new opportunity! 🎯",
            "Think outside the box! 💡",
        ],
        TaskType::Memorization => &[
            "Repetition is the mother of learning! 🔄",
            "Your brain is a sponge! 🧠",
            "Connect the dots! 🎯",
        ],
        TaskType::Research => &[
            "Explore the unknown! 🔍",
            "Every search leads to discovery! 🌟",
            "Connect the pieces of knowledge! 🧩",
        ],
    }
}

/// Picks a random quote for `task_type`, or a general one.
#[must_use]
pub fn pick(task_type: Option<TaskType>) -> &'static str {
    let table = match task_type {
        Some(task_type) => for_task_type(task_type),
        None => &GENERAL_QUOTES[..],
    };
    table.choose(&mut rand::rng()).copied().unwrap_or_default()
}
