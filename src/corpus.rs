//! Corpus construction: vocabulary interning and document tokenization
//!
//! Words are interned once into a [`Vocabulary`] arena and referenced
//! everywhere else by integer id, so documents, count tables, and
//! rankings never share string storage. Documents that produce no
//! tokens are dropped from the corpus and reported, not errored.

use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::Tokenizer;
use crate::types::{DocumentId, DocumentInput, DocumentText, SkipReason, SkippedDocument};
use rustc_hash::FxHashMap;

/// Index of an interned word in the vocabulary arena
pub type WordId = u32;

/// Tokens at most this many chars long are forced into the stopword set
const SHORT_TOKEN_LEN: usize = 2;

// ============================================================================
// Vocabulary
// ============================================================================

/// Interned vocabulary with per-word raw counts.
///
/// Raw counts include stopword occurrences; `modeled_types` counts only
/// the distinct non-stopword words, which is the vocabulary size the
/// sampler normalizes against.
#[derive(Debug, Default)]
pub struct Vocabulary {
    word_to_id: FxHashMap<String, WordId>,
    words: Vec<String>,
    raw_counts: Vec<u64>,
    stopword_flags: Vec<bool>,
    modeled_types: usize,
}

impl Vocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of a word, interning it on first sight.
    ///
    /// The stopword flag is fixed at first observation; the short-token
    /// rule makes that deterministic per word.
    pub fn observe(&mut self, word: &str, is_stopword: bool) -> WordId {
        if let Some(&id) = self.word_to_id.get(word) {
            self.raw_counts[id as usize] += 1;
            return id;
        }

        let id = self.words.len() as WordId;
        self.word_to_id.insert(word.to_string(), id);
        self.words.push(word.to_string());
        self.raw_counts.push(1);
        self.stopword_flags.push(is_stopword);
        if !is_stopword {
            self.modeled_types += 1;
        }
        id
    }

    /// Look up a word's id
    pub fn id(&self, word: &str) -> Option<WordId> {
        self.word_to_id.get(word).copied()
    }

    /// Get the word for an id
    pub fn word(&self, id: WordId) -> &str {
        &self.words[id as usize]
    }

    /// Total occurrences of a word, stopword uses included
    pub fn raw_count(&self, id: WordId) -> u64 {
        self.raw_counts[id as usize]
    }

    /// Whether the word was excluded from modeling
    pub fn is_stopword(&self, id: WordId) -> bool {
        self.stopword_flags[id as usize]
    }

    /// Number of distinct word types seen, stopwords included
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of distinct non-stopword word types
    pub fn modeled_types(&self) -> usize {
        self.modeled_types
    }
}

// ============================================================================
// Documents
// ============================================================================

/// One token position in a document
#[derive(Debug, Clone, Copy)]
pub struct Token {
    /// Interned word id
    pub word: WordId,
    /// Current topic assignment, meaningful only for non-stopwords
    pub topic: usize,
    /// Whether this position is excluded from sampling
    pub is_stopword: bool,
}

/// A tokenized document with its per-topic assignment counts
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub original_text: String,
    pub tokens: Vec<Token>,
    /// Tokens of this document currently assigned to each topic
    pub topic_counts: Vec<u32>,
    pub(crate) nonstop_tokens: usize,
}

impl Document {
    /// Number of non-stopword tokens, the denominator basis for scoring
    pub fn nonstop_token_count(&self) -> usize {
        self.nonstop_tokens
    }
}

/// The assembled corpus: documents, shared vocabulary, and skip report
#[derive(Debug)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub vocabulary: Vocabulary,
    pub stopwords: StopwordFilter,
    pub skipped: Vec<SkippedDocument>,
}

/// Tokenize and intern a sequence of input documents.
///
/// Raw strings go through the Unicode tokenizer; pre-tokenized arrays
/// are taken verbatim. Inputs that yield no tokens are recorded in
/// `skipped` and produce no document. Tokens of length ≤ 2 force their
/// word into the stopword set for the whole corpus.
pub fn build_corpus(
    inputs: Vec<DocumentInput>,
    mut stopwords: StopwordFilter,
    num_topics: usize,
) -> Corpus {
    let tokenizer = Tokenizer::new();
    let mut vocabulary = Vocabulary::new();
    let mut documents = Vec::with_capacity(inputs.len());
    let mut skipped = Vec::new();

    for input in inputs {
        let (original_text, words, was_empty) = match input.text {
            DocumentText::Raw(text) => {
                let was_empty = text.trim().is_empty();
                let words = tokenizer.tokenize(&text);
                (text, words, was_empty)
            }
            DocumentText::Tokens(tokens) => {
                let was_empty = tokens.is_empty();
                (tokens.join(" "), tokens, was_empty)
            }
        };

        if words.is_empty() {
            let reason = if was_empty {
                SkipReason::EmptyText
            } else {
                SkipReason::NoTokens
            };
            skipped.push(SkippedDocument {
                id: input.id,
                reason,
            });
            continue;
        }

        let mut tokens = Vec::with_capacity(words.len());
        let mut nonstop_tokens = 0;
        for word in &words {
            if word.chars().count() <= SHORT_TOKEN_LEN {
                stopwords.insert(word.clone());
            }
            let is_stopword = stopwords.is_stopword(word);
            let id = vocabulary.observe(word, is_stopword);
            if !is_stopword {
                nonstop_tokens += 1;
            }
            tokens.push(Token {
                word: id,
                topic: 0,
                is_stopword,
            });
        }

        documents.push(Document {
            id: input.id,
            original_text,
            tokens,
            topic_counts: vec![0; num_topics],
            nonstop_tokens,
        });
    }

    Corpus {
        documents,
        vocabulary,
        stopwords,
        skipped,
    }
}
