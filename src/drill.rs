//! Practice text generation for Koch-method drills.
//!
//! Produces symbolic units directly, so prosigns in the Koch order are
//! never confused with the letters that spell their names.

use crate::error::{MorseError, Result};
use crate::morse::{lookup_token, tokenize, SymbolicUnit};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Koch teaching order: one new character per level.
pub const KOCH_ORDER: [&str; 53] = [
    "K", "M", "R", "S", "U", "A", "P", "T", "L", "O", "W", "I", ".", "N", "J", "E", "F", "0",
    "Y", ",", "V", "G", "5", "/", "Q", "9", "Z", "H", "3", "8", "B", "?", "4", "2", "7", "C",
    "1", "D", "6", "X", "BT", "SK", "AR", "AA", "AS", "VE", "INT", "HH", "KA", "CT", "KN", "NJ",
    "SN",
];

/// Longest pseudo-word in random character mode.
const MAX_GROUP_LEN: usize = 8;

/// Common English words and operating terms used when no word file is
/// given. Around 600 entries; pass a word file for a larger vocabulary.
pub const BUILTIN_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "it", "for", "not", "on", "with",
    "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we", "say", "her",
    "she", "or", "an", "will", "my", "one", "all", "would", "there", "their", "what", "so", "up",
    "out", "if", "about", "who", "get", "which", "go", "me", "when", "make", "can", "like", "time",
    "no", "just", "him", "know", "take", "people", "into", "year", "your", "good", "some", "could",
    "them", "see", "other", "than", "then", "now", "look", "only", "come", "its", "over", "think",
    "also", "back", "after", "use", "two", "how", "our", "work", "first", "well", "way", "even",
    "new", "want", "because", "any", "these", "give", "day", "most", "us", "is", "are", "was",
    "were", "been", "has", "had", "did", "said", "man", "old", "must", "name", "am", "rig", "ant",
    "wx", "temp", "power", "here", "test", "radio", "signal", "copy", "report", "station", "home",
    "sun", "rain", "snow", "wind", "cold", "warm", "hot", "ask", "put", "mark", "park", "walk",
    "talk", "milk", "silk", "salt", "malt", "task", "mask", "rust", "dust", "trust", "storm",
    "sort", "port", "sport", "worm", "form", "mom", "mum", "pop", "top", "stop", "spot", "pot",
    "lot", "slot", "plot", "rot", "tip", "trip", "slip", "slim", "swim", "swam", "tram", "trap",
    "strap", "map", "mop", "lamp", "ramp", "stamp", "pump", "jump", "lump", "sum", "rum", "mill",
    "pill", "kill", "till", "still", "skill", "spill", "wall", "tall", "mall", "ball", "call",
    "fall", "small", "stall", "sail", "tail", "mail", "pail", "rail", "trail", "wait", "suit",
    "fruit", "list", "mist", "wrist", "twist", "kit", "sit", "pit", "wit", "split", "tour", "pour",
    "sour", "four", "owl", "bowl", "soul", "soil", "oil", "toil", "spoil", "coil", "foil", "tool",
    "pool", "cool", "wool", "roll", "toll", "poll", "pair", "air", "lair", "star", "tar", "war",
    "tramp", "swamp", "wasp", "past", "last", "mast", "fast", "cast", "vast", "arm", "art", "army",
    "mars", "lark", "pork", "word", "world", "lord", "sword", "worst", "post", "lost", "cost",
    "moss", "loss", "boss", "toss", "miss", "kiss", "again", "water", "number", "sound", "place",
    "where", "great", "help", "through", "much", "before", "line", "right", "too", "mean", "same",
    "tell", "boy", "follow", "came", "show", "around", "three", "play", "end", "read", "hand",
    "large", "spell", "add", "land", "big", "high", "such", "act", "why", "men", "change", "went",
    "light", "kind", "off", "need", "house", "picture", "try", "animal", "point", "mother", "near",
    "build", "self", "earth", "father", "head", "stand", "own", "page", "should", "country",
    "found", "answer", "school", "grow", "study", "learn", "plant", "cover", "food", "between",
    "state", "keep", "eye", "never", "let", "thought", "city", "tree", "cross", "farm", "hard",
    "start", "might", "story", "saw", "far", "sea", "draw", "left", "late", "run", "while",
    "press", "close", "night", "real", "life", "few", "north", "open", "seem", "together", "next",
    "white", "children", "begin", "got", "example", "ease", "paper", "group", "always", "music",
    "those", "both", "often", "letter", "until", "mile", "river", "car", "feet", "care", "second",
    "book", "carry", "took", "science", "eat", "room", "friend", "began", "idea", "fish",
    "mountain", "once", "base", "hear", "horse", "cut", "sure", "watch", "color", "face", "wood",
    "main", "enough", "plain", "girl", "usual", "young", "ready", "above", "ever", "red", "though",
    "feel", "bird", "soon", "body", "dog", "family", "direct", "pose", "leave", "song", "measure",
    "door", "product", "black", "short", "numeral", "class", "question", "happen", "complete",
    "ship", "area", "half", "rock", "order", "fire", "south", "problem", "piece", "told", "knew",
    "pass", "since", "whole", "king", "space", "heard", "best", "hour", "better", "true", "during",
    "hundred", "five", "remember", "step", "early", "hold", "west", "ground", "interest", "reach",
    "verb", "sing", "listen", "six", "table", "travel", "less", "morning", "ten", "simple",
    "several", "vowel", "toward", "lay", "against", "pattern", "slow", "center", "love", "person",
    "money", "serve", "appear", "road", "rule", "govern", "pull", "notice", "voice", "unit",
    "town", "fine", "certain", "fly", "lead", "cry", "dark", "machine", "note", "plan", "figure",
    "box", "noun", "field", "rest", "correct", "able", "pound", "done", "beauty", "drive", "stood",
    "contain", "front", "teach", "week", "final", "gave", "green", "quick", "develop", "ocean",
    "free", "minute", "strong", "special", "mind", "behind", "clear", "produce", "fact", "street",
    "inch", "multiply", "nothing", "course", "stay", "wheel", "full", "force", "blue", "object",
    "decide", "surface", "deep", "moon", "island", "foot", "system", "busy", "record", "boat",
    "common", "gold", "possible", "plane", "stead", "dry", "wonder", "laugh", "thousand", "ago",
    "ran", "check", "game", "shape", "equate", "brought", "heat", "tire", "bring", "yes",
    "distant", "fill", "east", "paint", "language", "among", "antenna", "band", "beam", "dipole",
    "key", "morse", "code", "tone", "sked", "qso", "qrp", "qth", "rst", "dx", "cq", "ham", "net",
    "log", "wire", "coax", "tower", "tuner", "meter", "watt", "volt", "amp", "ohm", "freq", "sign",
    "op",
];

/// Active characters for a Koch level.
///
/// Level 0 selects the whole Koch order; level `n` the first `n` entries.
pub fn koch_characters(level: usize) -> Vec<SymbolicUnit> {
    let take = if level == 0 {
        KOCH_ORDER.len()
    } else {
        level.min(KOCH_ORDER.len())
    };
    KOCH_ORDER[..take]
        .iter()
        .filter_map(|token| lookup_token(token))
        .collect()
}

/// Active characters from a custom alphabet string.
///
/// Each non-whitespace character is a unit; `<NAME>` adds a prosign.
///
/// # Errors
///
/// Returns `UnknownSymbol` if a character has no Morse code.
pub fn custom_characters(alphabet: &str) -> Result<Vec<SymbolicUnit>> {
    let mut units: Vec<SymbolicUnit> = Vec::new();
    for (index, unit) in tokenize(alphabet)?.into_iter().enumerate() {
        if unit.is_space() || units.contains(&unit) {
            continue;
        }
        if crate::morse::lookup(unit).is_none() {
            return Err(MorseError::UnknownSymbol {
                unit: unit.to_string(),
                index,
            });
        }
        units.push(unit);
    }
    Ok(units)
}

/// Reads a list file with one entry per line, skipping blank lines.
pub fn load_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Generates drill messages from a set of active characters.
pub struct DrillGenerator<R> {
    rng: R,
    characters: Vec<SymbolicUnit>,
}

impl<R: Rng> DrillGenerator<R> {
    /// Creates a generator drawing from `characters`.
    pub fn new(rng: R, characters: Vec<SymbolicUnit>) -> Self {
        Self { rng, characters }
    }

    /// The active characters.
    pub fn characters(&self) -> &[SymbolicUnit] {
        &self.characters
    }

    /// Random characters grouped into pseudo-words of 1 to 8 units.
    pub fn random_characters(&mut self, count: usize) -> Vec<SymbolicUnit> {
        let mut units = Vec::with_capacity(count + count / 2);
        let mut group_len = self.rng.gen_range(1..=MAX_GROUP_LEN);
        let mut in_group = 0;

        for _ in 0..count {
            let Some(&unit) = self.characters.choose(&mut self.rng) else {
                break;
            };
            if in_group >= group_len {
                group_len = self.rng.gen_range(1..=MAX_GROUP_LEN);
                in_group = 0;
                units.push(SymbolicUnit::SPACE);
            }
            in_group += 1;
            units.push(unit);
        }

        units
    }

    /// Random words spelled only with active characters.
    ///
    /// Words whose length lies in `min_len..=max_len` are candidates
    /// (`max_len` is raised to `min_len` if smaller). Each word is followed
    /// by a space, or by one of `. , ?` plus a space when those are active.
    ///
    /// # Errors
    ///
    /// Returns `EmptyWordList` if no word qualifies.
    pub fn words<S: AsRef<str>>(
        &mut self,
        list: &[S],
        count: usize,
        min_len: usize,
        max_len: usize,
    ) -> Result<Vec<SymbolicUnit>> {
        let max_len = max_len.max(min_len);
        let candidates: Vec<String> = list
            .iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| {
                let len = w.chars().count();
                len >= min_len
                    && len <= max_len
                    && w.chars()
                        .all(|c| self.characters.contains(&SymbolicUnit::Char(c)))
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if candidates.is_empty() {
            return Err(MorseError::EmptyWordList {
                min: min_len,
                max: max_len,
            });
        }

        let separators: Vec<char> = ['.', ',', '?']
            .into_iter()
            .filter(|c| self.characters.contains(&SymbolicUnit::Char(*c)))
            .collect();

        let mut units = Vec::new();
        for _ in 0..count {
            if let Some(word) = candidates.choose(&mut self.rng) {
                units.extend(word.chars().map(SymbolicUnit::from));
            }
            // One slot for the plain space, one per punctuation mark.
            let pick = self.rng.gen_range(0..=separators.len());
            if pick > 0 {
                units.push(SymbolicUnit::Char(separators[pick - 1]));
            }
            units.push(SymbolicUnit::SPACE);
        }

        Ok(units)
    }

    /// Random callsigns, each followed by a space.
    ///
    /// Draws from `list` when given and non-empty, otherwise makes up
    /// US-style callsigns.
    pub fn callsigns<S: AsRef<str>>(
        &mut self,
        list: Option<&[S]>,
        count: usize,
    ) -> Result<Vec<SymbolicUnit>> {
        let known: Vec<String> = list
            .unwrap_or(&[])
            .iter()
            .map(|c| c.as_ref().trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut units = Vec::new();
        for _ in 0..count {
            let callsign = match known.choose(&mut self.rng) {
                Some(c) => c.clone(),
                None => self.make_callsign(),
            };
            units.extend(tokenize(&callsign)?);
            units.push(SymbolicUnit::SPACE);
        }
        Ok(units)
    }

    fn make_callsign(&mut self) -> String {
        const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

        let mut call = String::new();
        match self.rng.gen_range(0..3) {
            0 => call.push(*b"KNW".choose(&mut self.rng).unwrap_or(&b'K') as char),
            1 => {
                call.push(*b"KNW".choose(&mut self.rng).unwrap_or(&b'K') as char);
                call.push(*LETTERS.choose(&mut self.rng).unwrap_or(&b'A') as char);
            }
            _ => {
                call.push('A');
                call.push(*b"ABCDEFGHIJKL".choose(&mut self.rng).unwrap_or(&b'A') as char);
            }
        }
        call.push(char::from(b'0' + self.rng.gen_range(0..10u8)));
        for _ in 0..self.rng.gen_range(1..=3) {
            call.push(*LETTERS.choose(&mut self.rng).unwrap_or(&b'A') as char);
        }
        call
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morse::Prosign;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator(characters: Vec<SymbolicUnit>) -> DrillGenerator<StdRng> {
        DrillGenerator::new(StdRng::seed_from_u64(7), characters)
    }

    #[test]
    fn test_koch_levels() {
        assert_eq!(
            koch_characters(2),
            vec![SymbolicUnit::Char('K'), SymbolicUnit::Char('M')]
        );
        let all = koch_characters(0);
        assert_eq!(all.len(), KOCH_ORDER.len());
        assert_eq!(all[40], SymbolicUnit::Prosign(Prosign::BT));
        assert_eq!(koch_characters(500).len(), KOCH_ORDER.len());
    }

    #[test]
    fn test_custom_characters() {
        let units = custom_characters("kmk<AR>").unwrap();
        assert_eq!(
            units,
            vec![
                SymbolicUnit::Char('K'),
                SymbolicUnit::Char('M'),
                SymbolicUnit::Prosign(Prosign::AR),
            ]
        );
        assert!(matches!(
            custom_characters("K#"),
            Err(MorseError::UnknownSymbol { index: 1, .. })
        ));
    }

    #[test]
    fn test_random_characters_groups() {
        let mut g = generator(koch_characters(5));
        let units = g.random_characters(200);

        let letters: Vec<_> = units.iter().filter(|u| !u.is_space()).collect();
        assert_eq!(letters.len(), 200);
        assert!(letters.iter().all(|u| g.characters().contains(u)));

        let mut run = 0;
        for unit in &units {
            if unit.is_space() {
                assert!(run >= 1);
                run = 0;
            } else {
                run += 1;
                assert!(run <= MAX_GROUP_LEN);
            }
        }
        assert!(!units[0].is_space());
    }

    #[test]
    fn test_words_use_active_characters() {
        let mut g = generator(custom_characters("THEAN.").unwrap());
        let units = g
            .words(&["the", "then", "ant", "hat", "zebra", "a"], 30, 2, 3)
            .unwrap();

        let text = crate::morse::units_to_text(&units);
        for word in text.split(' ').filter(|w| !w.is_empty()) {
            let word = word.trim_end_matches('.');
            assert!(["THE", "ANT", "HAT"].contains(&word), "{}", word);
        }
        assert!(units.last().unwrap().is_space());
    }

    #[test]
    fn test_builtin_words_distinct_and_usable_early() {
        let distinct: BTreeSet<&str> = BUILTIN_WORDS.iter().copied().collect();
        assert_eq!(distinct.len(), BUILTIN_WORDS.len());
        assert!(BUILTIN_WORDS
            .iter()
            .all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase())));

        // Level 12 covers K M R S U A P T L O W I.
        let mut g = generator(koch_characters(12));
        let units = g.words(BUILTIN_WORDS, 200, 1, 5).unwrap();
        let text = crate::morse::units_to_text(&units);
        let seen: BTreeSet<&str> = text.split_whitespace().collect();
        assert!(seen.len() > 50, "only {} distinct words", seen.len());
    }

    #[test]
    fn test_words_max_raised_to_min() {
        let mut g = generator(custom_characters("THE").unwrap());
        let units = g.words(&["the"], 1, 3, 1).unwrap();
        assert_eq!(crate::morse::units_to_text(&units), "THE ");
    }

    #[test]
    fn test_words_empty_list() {
        let mut g = generator(koch_characters(2));
        assert!(matches!(
            g.words(&["the"], 5, 1, 5),
            Err(MorseError::EmptyWordList { min: 1, max: 5 })
        ));
    }

    #[test]
    fn test_callsigns_from_list() {
        let mut g = generator(Vec::new());
        let units = g.callsigns(Some(&["w1aw", "k2/vk3"][..]), 4).unwrap();
        let text = crate::morse::units_to_text(&units);
        for call in text.split_whitespace() {
            assert!(call == "W1AW" || call == "K2/VK3", "{}", call);
        }
        assert_eq!(text.split_whitespace().count(), 4);
    }

    #[test]
    fn test_generated_callsigns() {
        let mut g = generator(Vec::new());
        let units = g.callsigns::<&str>(None, 20).unwrap();
        let text = crate::morse::units_to_text(&units);
        let calls: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(calls.len(), 20);
        for call in calls {
            assert!(call.chars().any(|c| c.is_ascii_digit()), "{}", call);
            assert!(call.len() >= 3 && call.len() <= 6, "{}", call);
            assert!(call.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_load_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "alpha\n\n  bravo \ncharlie\n").unwrap();
        assert_eq!(load_list(&path).unwrap(), vec!["alpha", "bravo", "charlie"]);
        assert!(load_list(dir.path().join("nope.txt")).is_err());
    }
}
