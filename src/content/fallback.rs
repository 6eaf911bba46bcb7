use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::round::{GameKind, Prompt};

pub const DEFAULT_MAX_HISTORY: usize = 50;

const TRIVIA: &[(&str, &str, [&str; 3])] = &[
    ("What is the capital of Pakistan?", "Islamabad", ["Karachi", "Lahore", "Peshawar"]),
    ("Which planet is known as the Red Planet?", "Mars", ["Venus", "Jupiter", "Mercury"]),
    ("What is the largest ocean on Earth?", "Pacific Ocean", ["Atlantic Ocean", "Indian Ocean", "Arctic Ocean"]),
    ("How many continents are there?", "7", ["5", "6", "8"]),
    ("What is the chemical symbol for gold?", "Au", ["Ag", "Gd", "Go"]),
    ("Who painted the Mona Lisa?", "Leonardo da Vinci", ["Michelangelo", "Raphael", "Vincent van Gogh"]),
    ("What is the longest river in the world?", "Nile", ["Amazon", "Yangtze", "Indus"]),
    ("Which gas do plants absorb from the air?", "Carbon dioxide", ["Oxygen", "Nitrogen", "Helium"]),
    ("What is the tallest mountain in Pakistan?", "K2", ["Nanga Parbat", "Rakaposhi", "Tirich Mir"]),
    ("How many sides does a hexagon have?", "6", ["5", "7", "8"]),
    ("What is the hardest natural substance?", "Diamond", ["Quartz", "Granite", "Iron"]),
    ("Which language has the most native speakers?", "Mandarin Chinese", ["English", "Spanish", "Hindi"]),
];

const RIDDLES: &[(&str, &str)] = &[
    ("What has keys but can't open locks?", "keyboard"),
    ("What has hands but can't clap?", "clock"),
    ("What gets wetter the more it dries?", "towel"),
    ("What has a neck but no head?", "bottle"),
    ("What can travel around the world while staying in a corner?", "stamp"),
    ("What has to be broken before you can use it?", "egg"),
    ("I'm tall when I'm young and short when I'm old. What am I?", "candle"),
    ("What has many teeth but can't bite?", "comb"),
    ("What goes up but never comes down?", "age"),
    ("What has one eye but can't see?", "needle"),
];

const SONGS: &[(&str, &str)] = &[
    ("Dil dil Pakistan, jaan jaan Pakistan", "Dil Dil Pakistan"),
    ("Aye watan pyare watan pak watan", "Aye Watan Pyare Watan"),
    ("Mera bichra yaar mujhe aaj mil gaya", "Mera Bichra Yaar"),
    ("Sayonee mere dil ki", "Sayonee"),
    ("Lag ja gale ke phir ye haseen raat ho na ho", "Lag Ja Gale"),
    ("Tujhe dekha to ye jaana sanam", "Tujhe Dekha To"),
    ("Kal ho naa ho kal ho naa ho", "Kal Ho Naa Ho"),
    ("Is this the real life? Is this just fantasy?", "Bohemian Rhapsody"),
    ("Just a small town girl, living in a lonely world", "Don't Stop Believin'"),
    ("I got the eye of the tiger, a fighter", "Eye of the Tiger"),
    ("Hello from the other side", "Hello"),
    ("Sweet dreams are made of this", "Sweet Dreams"),
    ("Imagine all the people living life in peace", "Imagine"),
    ("Hey Jude, don't make it bad", "Hey Jude"),
];

const TYPING: &[&str] = &[
    "The quick brown fox jumps over the lazy dog",
    "A cup of tea solves almost everything",
    "Practice makes progress, not perfection",
    "Every cloud has a silver lining",
    "Slow and steady wins the race",
    "Actions speak louder than words",
    "Where there is a will there is a way",
    "Good things come to those who wait",
];

/// Recently used prompt indices for one kind.
///
/// Picks never repeat until every prompt has been used, then the history
/// resets. At most `max_history` indices are remembered.
#[derive(Debug, Clone)]
pub struct QuestionHistory {
    asked: VecDeque<usize>,
    max_history: usize,
}

impl QuestionHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            asked: VecDeque::new(),
            max_history,
        }
    }

    /// Chooses an index in `0..len`; `None` only when `len` is zero
    pub fn pick<R: rand::Rng + ?Sized>(&mut self, len: usize, rng: &mut R) -> Option<usize> {
        let mut available: Vec<usize> = (0..len).filter(|i| !self.asked.contains(i)).collect();
        if available.is_empty() {
            self.asked.clear();
            available = (0..len).collect();
        }

        let index = *available.choose(rng)?;
        self.asked.push_back(index);
        while self.asked.len() > self.max_history {
            self.asked.pop_front();
        }
        Some(index)
    }

    pub fn len(&self) -> usize {
        self.asked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asked.is_empty()
    }
}

/// Static prompts used whenever a remote source has nothing
#[derive(Debug)]
pub struct FallbackBank {
    prompts: HashMap<GameKind, Vec<Prompt>>,
    history: Mutex<HashMap<GameKind, QuestionHistory>>,
    max_history: usize,
}

impl FallbackBank {
    pub fn new(max_history: usize) -> Self {
        let mut prompts = HashMap::new();

        prompts.insert(
            GameKind::Trivia,
            TRIVIA
                .iter()
                .map(|(question, answer, wrong)| {
                    let mut options: Vec<String> = wrong.iter().map(|w| w.to_string()).collect();
                    options.push(answer.to_string());
                    Prompt::new(GameKind::Trivia, *question, *answer).with_options(options)
                })
                .collect(),
        );
        prompts.insert(
            GameKind::Riddle,
            RIDDLES
                .iter()
                .map(|(question, answer)| Prompt::new(GameKind::Riddle, *question, *answer))
                .collect(),
        );
        prompts.insert(
            GameKind::Song,
            SONGS
                .iter()
                .map(|(lyrics, title)| Prompt::new(GameKind::Song, *lyrics, *title))
                .collect(),
        );
        prompts.insert(
            GameKind::Typing,
            TYPING
                .iter()
                .map(|phrase| Prompt::new(GameKind::Typing, *phrase, *phrase))
                .collect(),
        );

        Self::with_prompts(prompts, max_history)
    }

    /// A bank with caller-provided prompts; kinds without any yield `None`
    pub fn with_prompts(prompts: HashMap<GameKind, Vec<Prompt>>, max_history: usize) -> Self {
        Self {
            prompts,
            history: Mutex::new(HashMap::new()),
            max_history,
        }
    }

    /// A random prompt of `kind` not handed out recently. Trivia options are
    /// reshuffled on every pick.
    pub fn pick(&self, kind: GameKind) -> Option<Prompt> {
        let prompts = self.prompts.get(&kind)?;
        let mut rng = rand::rng();

        let index = {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            history
                .entry(kind)
                .or_insert_with(|| QuestionHistory::new(self.max_history))
                .pick(prompts.len(), &mut rng)?
        };

        let mut prompt = prompts[index].clone();
        prompt.options.shuffle(&mut rng);

        debug!(kind = %kind, index, "Picked fallback prompt");
        Some(prompt)
    }

    pub fn count(&self, kind: GameKind) -> usize {
        self.prompts.get(&kind).map_or(0, Vec::len)
    }
}

impl Default for FallbackBank {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
