//! Dictionary models and the embedded-dictionary loader.
//!
//! Every matchable surface form lives in a JSON table under `resources/`,
//! one set per supported language. Tables are parsed once at construction;
//! the pattern structs carry a couple of lengths derived from the pattern
//! text so the matching code never has to re-scan for placeholders.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Substituted for every character of an extracted number before pattern
/// matching, so dictionary patterns can name a number slot with one char.
pub const PLACE_HOLDER: char = 'ǂ';

/// Dictionary construction error
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("unsupported language code: {code:?} (bundled dictionaries: ja)")]
    UnsupportedLanguage { code: String },

    #[error("malformed dictionary {name}: {source}")]
    Malformed {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Language whose dictionary set to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Japanese,
}

impl Language {
    pub fn from_code(code: &str) -> Result<Self, DictError> {
        match code {
            "ja" | "jp" | "japanese" => Ok(Language::Japanese),
            _ => Err(DictError::UnsupportedLanguage { code: code.to_string() }),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}

/// One numeral character: its digit value or the power of ten it scales by
#[derive(Debug, Clone, Deserialize)]
pub struct ChineseCharacter {
    pub character: char,
    pub value: i64,
    /// "09" (ones numeral), "sen" (ten/hundred/thousand), "man" (ten
    /// thousand and above)
    pub notation_type: String,
}

/// Quantity pattern: a counter word with its scaling and ordinal flags
#[derive(Debug, Clone, Deserialize)]
pub struct CounterPattern {
    pub pattern: String,
    pub counter: String,
    #[serde(rename = "SI_prefix")]
    pub si_prefix: i32,
    pub optional_power_of_ten: i32,
    pub ordinary: bool,
    pub option: String,
    #[serde(skip)]
    pub place_holder_count: usize,
    #[serde(skip)]
    pub trailing_len: usize,
}

/// Temporal pattern: each consumed number slot maps to a time position code
/// (`y`, `m`, `d`, `h`, `mn`, `s`, `seiki`, signed and week variants) with an
/// optional process type applied after assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct TimePattern {
    pub pattern: String,
    pub corresponding_time_position: Vec<String>,
    #[serde(default)]
    pub process_type: Vec<String>,
    #[serde(default)]
    pub ordinary: bool,
    #[serde(default)]
    pub option: String,
    #[serde(skip)]
    pub place_holder_count: usize,
    #[serde(skip)]
    pub trailing_len: usize,
}

/// Prefix or suffix modifier: a literal with a single process type
#[derive(Debug, Clone, Deserialize)]
pub struct NumberModifier {
    pub pattern: String,
    pub process_type: String,
}

/// Common view over pattern entries used by the longest-match searches
pub trait DictPattern {
    fn pattern(&self) -> &str;
    fn place_holder_count(&self) -> usize;
    /// Characters strictly after the final placeholder; the full pattern
    /// length when the pattern has no placeholder.
    fn trailing_len(&self) -> usize;
}

impl DictPattern for CounterPattern {
    fn pattern(&self) -> &str {
        &self.pattern
    }
    fn place_holder_count(&self) -> usize {
        self.place_holder_count
    }
    fn trailing_len(&self) -> usize {
        self.trailing_len
    }
}

impl DictPattern for TimePattern {
    fn pattern(&self) -> &str {
        &self.pattern
    }
    fn place_holder_count(&self) -> usize {
        self.place_holder_count
    }
    fn trailing_len(&self) -> usize {
        self.trailing_len
    }
}

impl DictPattern for NumberModifier {
    fn pattern(&self) -> &str {
        &self.pattern
    }
    fn place_holder_count(&self) -> usize {
        0
    }
    fn trailing_len(&self) -> usize {
        self.pattern.chars().count()
    }
}

fn derive_lengths(pattern: &str) -> (usize, usize) {
    let chars: Vec<char> = pattern.chars().collect();
    let count = chars.iter().filter(|&&c| c == PLACE_HOLDER).count();
    let trailing = match chars.iter().rposition(|&c| c == PLACE_HOLDER) {
        Some(idx) => chars.len() - idx - 1,
        None => chars.len(),
    };
    (count, trailing)
}

/// The full dictionary set for one language
#[derive(Debug, Clone)]
pub struct Dictionaries {
    pub characters: Vec<ChineseCharacter>,

    pub num_counters: Vec<CounterPattern>,
    pub num_prefix_counters: Vec<CounterPattern>,
    pub num_prefix_modifiers: Vec<NumberModifier>,
    pub num_suffix_modifiers: Vec<NumberModifier>,

    pub abstime_expressions: Vec<TimePattern>,
    pub abstime_prefix_counters: Vec<TimePattern>,
    pub abstime_prefix_modifiers: Vec<NumberModifier>,
    pub abstime_suffix_modifiers: Vec<NumberModifier>,

    pub reltime_expressions: Vec<TimePattern>,
    pub reltime_prefix_counters: Vec<TimePattern>,
    pub reltime_prefix_modifiers: Vec<NumberModifier>,
    pub reltime_suffix_modifiers: Vec<NumberModifier>,

    pub duration_expressions: Vec<TimePattern>,
    pub duration_prefix_counters: Vec<TimePattern>,
    pub duration_prefix_modifiers: Vec<NumberModifier>,
    pub duration_suffix_modifiers: Vec<NumberModifier>,

    pub inappropriate_strings: Vec<String>,
}

#[derive(Deserialize)]
struct CharacterFile {
    characters: Vec<ChineseCharacter>,
}

#[derive(Deserialize)]
struct PatternFile<T> {
    patterns: Vec<T>,
}

#[derive(Deserialize)]
struct StringFile {
    strings: Vec<BlockedString>,
}

#[derive(Deserialize)]
struct BlockedString {
    #[serde(rename = "str")]
    value: String,
}

fn parse<T: DeserializeOwned>(name: &'static str, raw: &'static str) -> Result<T, DictError> {
    serde_json::from_str(raw).map_err(|source| DictError::Malformed { name, source })
}

fn counter_table(name: &'static str, raw: &'static str) -> Result<Vec<CounterPattern>, DictError> {
    let file: PatternFile<CounterPattern> = parse(name, raw)?;
    let mut patterns = file.patterns;
    for p in &mut patterns {
        let (count, trailing) = derive_lengths(&p.pattern);
        p.place_holder_count = count;
        p.trailing_len = trailing;
    }
    Ok(patterns)
}

fn time_table(name: &'static str, raw: &'static str) -> Result<Vec<TimePattern>, DictError> {
    let file: PatternFile<TimePattern> = parse(name, raw)?;
    let mut patterns = file.patterns;
    for p in &mut patterns {
        let (count, trailing) = derive_lengths(&p.pattern);
        p.place_holder_count = count;
        p.trailing_len = trailing;
    }
    Ok(patterns)
}

fn modifier_table(name: &'static str, raw: &'static str) -> Result<Vec<NumberModifier>, DictError> {
    let file: PatternFile<NumberModifier> = parse(name, raw)?;
    Ok(file.patterns)
}

impl Dictionaries {
    /// Load the embedded dictionary set for the given language
    pub fn load(language: Language) -> Result<Self, DictError> {
        match language {
            Language::Japanese => Self::load_ja(),
        }
    }

    fn load_ja() -> Result<Self, DictError> {
        macro_rules! ja {
            ($file:literal) => {
                include_str!(concat!("../resources/ja/", $file))
            };
        }

        let characters: CharacterFile =
            parse("chinese_character.json", ja!("chinese_character.json"))?;
        let strings: StringFile =
            parse("inappropriate_strings.json", ja!("inappropriate_strings.json"))?;

        let dict = Self {
            characters: characters.characters,

            num_counters: counter_table("num_counter.json", ja!("num_counter.json"))?,
            num_prefix_counters: counter_table(
                "num_prefix_counter.json",
                ja!("num_prefix_counter.json"),
            )?,
            num_prefix_modifiers: modifier_table("num_prefix.json", ja!("num_prefix.json"))?,
            num_suffix_modifiers: modifier_table("num_suffix.json", ja!("num_suffix.json"))?,

            abstime_expressions: time_table(
                "abstime_expression.json",
                ja!("abstime_expression.json"),
            )?,
            abstime_prefix_counters: time_table(
                "abstime_prefix_counter.json",
                ja!("abstime_prefix_counter.json"),
            )?,
            abstime_prefix_modifiers: modifier_table(
                "abstime_prefix.json",
                ja!("abstime_prefix.json"),
            )?,
            abstime_suffix_modifiers: modifier_table(
                "abstime_suffix.json",
                ja!("abstime_suffix.json"),
            )?,

            reltime_expressions: time_table(
                "reltime_expression.json",
                ja!("reltime_expression.json"),
            )?,
            reltime_prefix_counters: time_table(
                "reltime_prefix_counter.json",
                ja!("reltime_prefix_counter.json"),
            )?,
            reltime_prefix_modifiers: modifier_table(
                "reltime_prefix.json",
                ja!("reltime_prefix.json"),
            )?,
            reltime_suffix_modifiers: modifier_table(
                "reltime_suffix.json",
                ja!("reltime_suffix.json"),
            )?,

            duration_expressions: time_table(
                "duration_expression.json",
                ja!("duration_expression.json"),
            )?,
            duration_prefix_counters: time_table(
                "duration_prefix_counter.json",
                ja!("duration_prefix_counter.json"),
            )?,
            duration_prefix_modifiers: modifier_table(
                "duration_prefix.json",
                ja!("duration_prefix.json"),
            )?,
            duration_suffix_modifiers: modifier_table(
                "duration_suffix.json",
                ja!("duration_suffix.json"),
            )?,

            inappropriate_strings: strings.strings.into_iter().map(|s| s.value).collect(),
        };

        tracing::info!(
            characters = dict.characters.len(),
            counters = dict.num_counters.len(),
            abstime = dict.abstime_expressions.len(),
            reltime = dict.reltime_expressions.len(),
            duration = dict.duration_expressions.len(),
            "loaded ja dictionaries"
        );

        Ok(dict)
    }
}
