use std::{collections::HashSet, sync::Arc};

use rand::Rng;

use crate::{
    models::MovieRecord,
    services::generative::{GenerationError, TextGenerator},
};

const LONG_SENTENCE: usize = 160;
const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 10.0;

/// Phrases used to write a director's fallback description
#[derive(Debug, PartialEq, Eq)]
pub struct StyleProfile {
    pub signature: &'static str,
    pub focus: &'static str,
    pub texture: &'static str,
}

const STYLE_PROFILES: &[(&str, StyleProfile)] = &[
    (
        "Christopher Nolan",
        StyleProfile {
            signature: "weaves temporal paradoxes with mathematical precision",
            focus: "His cerebral pulse expands",
            texture: "pairing epic tension with science-fiction atmospheres",
        },
    ),
    (
        "Quentin Tarantino",
        StyleProfile {
            signature: "pairs razor-sharp dialogue with choreographed violence",
            focus: "His grindhouse style reverberates",
            texture: "fueling pop homages and a breakneck rhythm",
        },
    ),
    (
        "Martin Scorsese",
        StyleProfile {
            signature: "explores morality and guilt with a restless camera",
            focus: "His operatic storytelling stands out",
            texture: "showing complex characters wrapped in enveloping music",
        },
    ),
    (
        "Steven Spielberg",
        StyleProfile {
            signature: "fuses childlike wonder with cinematic spectacle",
            focus: "His humanist gaze guides every set piece",
            texture: "creating heartfelt adventures full of imagination",
        },
    ),
    (
        "Denis Villeneuve",
        StyleProfile {
            signature: "sculpts contemplative, melancholic science fiction",
            focus: "His command of silence and scale is hypnotic",
            texture: "bathing every image in sensory futurism",
        },
    ),
    (
        "Wes Anderson",
        StyleProfile {
            signature: "draws pop symmetries brimming with melancholy",
            focus: "His pastel palette narrates family obsessions",
            texture: "mixing dry humor with millimetric choreography",
        },
    ),
    (
        "David Fincher",
        StyleProfile {
            signature: "dissects dark obsessions with surgical precision",
            focus: "His cold, meticulous direction grips",
            texture: "immersing every shot in psychological tension",
        },
    ),
    (
        "Bong Joon-ho",
        StyleProfile {
            signature: "leaps between genres to lay inequality bare",
            focus: "His black humor and social suspense hit hard",
            texture: "weaving satire, empathy and visual chaos",
        },
    ),
    (
        "Alejandro González Iñárritu",
        StyleProfile {
            signature: "confronts fate with an immersive, cathartic camera",
            focus: "His emotional sensitivity vibrates",
            texture: "while alternating brutal realism and visual poetry",
        },
    ),
    (
        "Alfonso Cuarón",
        StyleProfile {
            signature: "embraces long takes that float between intimacy and vertigo",
            focus: "His detailed humanism lights up every scene",
            texture: "blending naturalism with technical wonder",
        },
    ),
    (
        "Coen Brothers",
        StyleProfile {
            signature: "intertwine absurd humor with noir fatalism",
            focus: "Their meta irony and eccentric characters charm",
            texture: "mixing American folk with unexpected violence",
        },
    ),
    (
        "Paul Thomas Anderson",
        StyleProfile {
            signature: "portrays American obsessions with expansive lyricism",
            focus: "His fluid camera breathes alongside fragile characters",
            texture: "leaving layers of desire, power and spirituality",
        },
    ),
];

const DEFAULT_PROFILE: StyleProfile = StyleProfile {
    signature: "shapes auteur stories with an unmistakable personality",
    focus: "The narrative pulse leaves its mark",
    texture: "mixing visual sensitivity with thematic risk",
};

/// Case-insensitive profile lookup with a generic default
pub fn style_profile(director: &str) -> &'static StyleProfile {
    STYLE_PROFILES
        .iter()
        .find(|(name, _)| name.to_lowercase() == director.trim().to_lowercase())
        .map(|(_, profile)| profile)
        .unwrap_or(&DEFAULT_PROFILE)
}

fn last_name(director: &str) -> &str {
    director.split_whitespace().last().unwrap_or(director)
}

pub fn cycle_name_variants(director: &str) -> [String; 3] {
    let last = last_name(director);
    [
        format!("{} Essentials", last),
        format!("The {} Cycle", last),
        format!("{} Collection", last),
    ]
}

pub fn fallback_cycle_name(director: &str) -> String {
    let [a, b, c] = cycle_name_variants(director);
    match rand::thread_rng().gen_range(0..3) {
        0 => a,
        1 => b,
        _ => c,
    }
}

fn highlight_titles(movies: &[MovieRecord]) -> String {
    let titles: Vec<&str> = movies
        .iter()
        .map(|m| m.title.trim())
        .filter(|t| !t.is_empty())
        .take(2)
        .collect();

    match titles.as_slice() {
        [first, second] => format!("{} and {}", first, second),
        [only] => only.to_string(),
        _ => "these films".to_string(),
    }
}

fn fallback_lines(director: &str, movies: &[MovieRecord]) -> (String, String) {
    let profile = style_profile(director);
    let first = format!("{} {}.", director, profile.signature);
    let second = format!(
        "{} in {}, {}.",
        profile.focus,
        highlight_titles(movies),
        profile.texture
    );
    (first, second)
}

pub fn fallback_description(director: &str, movies: &[MovieRecord]) -> String {
    let (first, second) = fallback_lines(director, movies);
    format!("{}\n{}", first, second)
}

/// Uniform in [7.5, 9.5] with one decimal
pub fn fallback_rating() -> f64 {
    round_one_decimal(rand::thread_rng().gen_range(7.5..=9.5))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Splits after '.', '!' or '?' when followed by whitespace
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_idx, next)) = chars.peek() {
                if next.is_whitespace() {
                    let sentence = text[start..next_idx].trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence);
                    }
                    start = next_idx;
                }
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Normalizes free text to exactly two non-empty lines
pub fn ensure_two_lines(text: &str, director: &str, movies: &[MovieRecord]) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let sentences = split_sentences(&cleaned);

    match sentences.as_slice() {
        [] => fallback_description(director, movies),
        [first, second, ..] => format!("{}\n{}", first, second),
        [sentence] => {
            if sentence.chars().count() > LONG_SENTENCE {
                let midpoint = sentence.chars().count() / 2;
                let mid_byte = sentence
                    .char_indices()
                    .nth(midpoint)
                    .map(|(i, _)| i)
                    .unwrap_or(sentence.len());
                if let Some(offset) = sentence[mid_byte..].find(' ') {
                    let split = mid_byte + offset;
                    let first = sentence[..split].trim();
                    let second = sentence[split..].trim();
                    if !first.is_empty() && !second.is_empty() {
                        return format!("{}.\n{}", first, second);
                    }
                }
            }
            let (_, second_line) = fallback_lines(director, movies);
            format!("{}\n{}", sentence, second_line)
        }
    }
}

/// Reads the leading number of a reply and accepts it only within [1, 10]
pub fn parse_rating(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    let value: f64 = trimmed[..end].trim_end_matches('.').parse().ok()?;
    (MIN_RATING..=MAX_RATING)
        .contains(&value)
        .then(|| round_one_decimal(value))
}

/// Trims whitespace and surrounding quotes; `None` when nothing is left
pub fn clean_cycle_name(text: &str) -> Option<String> {
    let name = text
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”' | '*'))
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Parses 1-based list positions out of a reply like `{"indices":[1,3,4]}`
pub fn parse_indices(text: &str, total: usize) -> Vec<usize> {
    let mut seen = HashSet::new();
    text.split(|c: char| !c.is_ascii_digit())
        .filter_map(|token| token.parse::<usize>().ok())
        .filter(|index| (1..=total).contains(index))
        .filter(|index| seen.insert(*index))
        .collect()
}

fn movie_titles(movies: &[MovieRecord], take: usize) -> String {
    movies
        .iter()
        .take(take)
        .map(|m| m.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes cycle names, descriptions and ratings, generative when available
#[derive(Clone, Default)]
pub struct CycleDescriber {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl CycleDescriber {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    async fn ask(&self, prompt: &str) -> Option<Result<String, GenerationError>> {
        let generator = self.generator.as_ref()?;
        Some(generator.generate(prompt).await)
    }

    pub async fn cycle_name(&self, director: &str, movies: &[MovieRecord]) -> String {
        let prompt = format!(
            "Come up with a creative 2 to 3 word name for a film cycle devoted to director {}.\n\
             The movies included are: {}.\n\
             The name must be short, catchy and tied to the director's style.\n\
             Reply ONLY with the name, without explanations or quotes.",
            director,
            movie_titles(movies, 3)
        );

        let generated = match self.ask(&prompt).await {
            Some(reply) => reply.and_then(|text| {
                clean_cycle_name(&text).ok_or(GenerationError::Unusable(text))
            }),
            None => return fallback_cycle_name(director),
        };

        generated.unwrap_or_else(|e| {
            tracing::warn!(director = %director, error = %e, "Cycle name generation failed, using fallback");
            fallback_cycle_name(director)
        })
    }

    pub async fn description(&self, director: &str, movies: &[MovieRecord]) -> String {
        let titles = movie_titles(movies, movies.len());
        let prompt = format!(
            "Write EXACTLY two sentences in English describing the cinematic style of director {}.\n\
             Movies in this cycle: {}.\n\
             The first sentence must describe the director's tone, rhythm or visual traits.\n\
             The second must concretely mention 1 or 2 movies from the list or tie this cycle to the style.\n\
             Put a line break between the sentences and add nothing else.",
            director,
            if titles.is_empty() { "no specific titles" } else { titles.as_str() }
        );

        match self.ask(&prompt).await {
            Some(Ok(text)) => ensure_two_lines(&text, director, movies),
            Some(Err(e)) => {
                tracing::warn!(director = %director, error = %e, "Description generation failed, using fallback");
                fallback_description(director, movies)
            }
            None => fallback_description(director, movies),
        }
    }

    pub async fn rating(&self, director: &str, movies: &[MovieRecord]) -> f64 {
        let prompt = format!(
            "Rate the overall quality of a film cycle by director {} with these movies: {}.\n\
             Score it from 1 to 10 (one decimal) considering cinematic quality, coherence of the cycle and the director's relevance.\n\
             Reply ONLY with the number (for example: 8.5), without explanations.",
            director,
            movie_titles(movies, movies.len())
        );

        let generated = match self.ask(&prompt).await {
            Some(reply) => reply.and_then(|text| {
                parse_rating(&text).ok_or(GenerationError::Unusable(text))
            }),
            None => return fallback_rating(),
        };

        generated.unwrap_or_else(|e| {
            tracing::warn!(director = %director, error = %e, "Rating generation failed, using fallback");
            fallback_rating()
        })
    }

    /// Picks between `min` and `max` movies from a ranked pool
    ///
    /// Without a generator, or when the pick is unusable, the top `max` are kept.
    pub async fn curate(
        &self,
        director: &str,
        pool: Vec<MovieRecord>,
        min: usize,
        max: usize,
    ) -> Vec<MovieRecord> {
        if pool.len() <= max || self.generator.is_none() {
            return pool.into_iter().take(max).collect();
        }

        let listing = pool
            .iter()
            .enumerate()
            .map(|(i, m)| {
                format!(
                    "{}. {} ({}): {}",
                    i + 1,
                    m.title,
                    m.release_date.as_deref().unwrap_or("n/d"),
                    m.overview
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "From the following movies by director {}, pick {} to {} titles that form a coherent cycle describing the director's style.\n\
             {}\n\
             Return only JSON shaped like {{\"indices\":[n1,n2,n3,...]}} using the list numbers in ascending order.",
            director, min, max, listing
        );

        let picked = match self.ask(&prompt).await {
            Some(Ok(text)) => {
                let indices = parse_indices(&text, pool.len());
                if indices.len() >= min {
                    Ok(indices)
                } else {
                    Err(GenerationError::Unusable(text))
                }
            }
            Some(Err(e)) => Err(e),
            None => Ok(Vec::new()),
        };

        match picked {
            Ok(indices) if !indices.is_empty() => indices
                .into_iter()
                .take(max)
                .filter_map(|i| pool.get(i - 1).cloned())
                .collect(),
            Ok(_) => pool.into_iter().take(max).collect(),
            Err(e) => {
                tracing::warn!(director = %director, error = %e, "Movie curation failed, keeping top ranked");
                pool.into_iter().take(max).collect()
            }
        }
    }
}
