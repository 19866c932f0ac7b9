use logbook_core::NagTone;
use rand::seq::SliceRandom;
use rand::Rng;

/// Notification title shared by every reminder.
pub const TITLE: &str = "Logbook";

const ENCOURAGING: &[&str] = &[
    "You did real work today. Take a minute to log it!",
    "Small entries add up. Log one thing before you wrap up.",
    "Future you will thank you for logging today's work.",
    "One quick note and today's work is on the books.",
    "You're on a roll. Keep the streak going with a log entry.",
];

const BOSSY: &[&str] = &[
    "Log your work. Now.",
    "No entry yet today. Fix that.",
    "Open the logbook and write something down.",
    "Your clients won't invoice themselves. Log it.",
    "Stop scrolling. Start logging.",
];

const FRIENDLY: &[&str] = &[
    "Hey! Got a second to log what you worked on today?",
    "Quick reminder: today's logbook is still empty.",
    "How did today go? Jot it down in your logbook.",
    "Don't forget to log today's tasks and payments.",
    "A little note now saves a lot of guessing later.",
];

const SARCASTIC: &[&str] = &[
    "Sure, you'll definitely remember all of this next month.",
    "Wow, another day of totally unbillable work?",
    "Your logbook misses you. Apparently you don't miss it.",
    "Bold strategy, not logging anything. Let's see how it plays out.",
    "I'm sure your accountant loves surprises.",
];

const NEUTRAL: &[&str] = &[
    "Nothing logged today yet.",
    "Reminder: log today's work.",
    "Your logbook has no entries for today.",
];

/// Message pool for a tone.
pub fn pool(tone: NagTone) -> &'static [&'static str] {
    match tone {
        NagTone::Encouraging => ENCOURAGING,
        NagTone::Bossy => BOSSY,
        NagTone::Friendly => FRIENDLY,
        NagTone::Sarcastic => SARCASTIC,
        NagTone::Neutral => NEUTRAL,
    }
}

/// Pick a message uniformly from the tone's pool, prefixed with the buddy's name if set.
pub fn pick_message<R: Rng + ?Sized>(tone: NagTone, buddy_name: Option<&str>, rng: &mut R) -> String {
    let text = pool(tone).choose(rng).copied().unwrap_or(NEUTRAL[0]);
    match buddy_name.map(str::trim).filter(|b| !b.is_empty()) {
        Some(buddy) => format!("{buddy} says: {text}"),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TONES: [NagTone; 5] = [
        NagTone::Encouraging,
        NagTone::Bossy,
        NagTone::Friendly,
        NagTone::Sarcastic,
        NagTone::Neutral,
    ];

    #[test]
    fn every_tone_has_messages() {
        for tone in TONES {
            assert!(!pool(tone).is_empty(), "{tone} pool is empty");
        }
    }

    #[test]
    fn picked_message_comes_from_pool() {
        let mut rng = rand::thread_rng();
        for tone in TONES {
            for _ in 0..20 {
                let msg = pick_message(tone, None, &mut rng);
                assert!(pool(tone).contains(&msg.as_str()), "{msg:?} not in {tone}");
            }
        }
    }

    #[test]
    fn buddy_prefix() {
        let mut rng = rand::thread_rng();
        let msg = pick_message(NagTone::Bossy, Some("Rex"), &mut rng);
        let rest = msg.strip_prefix("Rex says: ").unwrap();
        assert!(BOSSY.contains(&rest));
    }

    #[test]
    fn blank_buddy_is_ignored() {
        let mut rng = rand::thread_rng();
        let msg = pick_message(NagTone::Neutral, Some("  "), &mut rng);
        assert!(NEUTRAL.contains(&msg.as_str()));
    }
}
