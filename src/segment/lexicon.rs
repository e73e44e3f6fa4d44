//! Word lists driving the rule-based segmenter.
//!
//! All lookups are case-insensitive except the indicator lists, which match the
//! capitalised surface form of a proper-name token.

use std::collections::HashSet;

/// Closed word classes and gazetteers for English narrative text.
#[derive(Debug, Clone)]
pub struct Lexicon {
    determiners: HashSet<&'static str>,
    /// Determiners plus prepositions, conjunctions, pronouns, auxiliaries and particles.
    function_words: HashSet<&'static str>,
    verbs: HashSet<&'static str>,
    /// `-ly` words that are not adverbs.
    ly_nouns: HashSet<&'static str>,
    /// `-ed` / `-ing` words that behave as nouns or noun modifiers.
    participle_nouns: HashSet<&'static str>,
    titles: HashSet<&'static str>,
    first_names: HashSet<&'static str>,
    places: HashSet<&'static str>,
    org_indicators: HashSet<&'static str>,
    location_indicators: HashSet<&'static str>,
    place_prepositions: HashSet<&'static str>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::default_english()
    }
}

impl Lexicon {
    pub fn default_english() -> Self {
        let determiners: HashSet<_> = [
            "the", "a", "an", "this", "that", "these", "those", "its", "their", "our", "your",
            "his", "her", "my", "each", "every", "some", "any", "all", "no", "another", "such",
        ]
        .into_iter()
        .collect();

        let mut function_words = determiners.clone();
        function_words.extend([
            // prepositions
            "in", "on", "at", "to", "for", "of", "with", "by", "from", "into", "onto", "over",
            "under", "about", "across", "after", "before", "during", "through", "throughout",
            "between", "among", "within", "without", "against", "toward", "towards", "upon",
            "via", "per", "than", "as", "like", "around", "behind", "beyond", "despite",
            "following", "prior", "subsequent", "preceding", "along", "together", "due",
            "part",
            // conjunctions
            "and", "or", "but", "nor", "so", "yet", "because", "while", "although", "though",
            "if", "when", "whereas", "since", "until", "unless", "whether", "then", "thus",
            // pronouns
            "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "who",
            "whom", "whose", "which", "what", "where", "why", "how", "there", "here", "itself",
            "themselves", "ourselves", "one",
            "i'm", "we're", "they're", "you're", "it's", "we've", "they've", "i've", "we'll",
            "they'll", "he's", "she's", "that's", "there's",
            // auxiliaries and modals
            "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do",
            "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
            "must", "won't", "don't", "doesn't", "didn't", "can't", "isn't", "aren't",
            "wasn't", "weren't",
            // particles and degree words
            "not", "also", "very", "more", "most", "less", "least", "just", "only", "too",
            "even", "still", "already", "up", "out", "off", "down", "back", "again", "both",
            "either", "neither", "much", "many", "few", "several", "other", "own", "same",
        ]);

        let verbs = [
            "lead", "leads", "led", "improve", "improves", "increase", "increases", "reduce",
            "reduces", "enhance", "enhances", "launch", "launches", "drive", "drives", "drove",
            "grow", "grows", "grew", "make", "makes", "made", "take", "takes", "took", "see",
            "sees", "saw", "help", "helps", "enable", "enables", "support", "supports",
            "include", "includes", "contain", "contains", "comprise", "comprises", "require",
            "requires", "depend", "depends", "rely", "relies", "cause", "causes", "result",
            "results", "measure", "measures", "track", "tracks", "indicate", "indicates",
            "facilitate", "facilitates", "targets", "addresses", "focuses", "begin", "begins",
            "began", "become", "becomes", "became", "deliver", "delivers", "ship", "ships",
            "go", "goes", "went", "get", "gets", "got", "give", "gives", "gave", "show",
            "shows", "find", "finds", "found", "know", "knows", "knew", "need", "needs", "want",
            "wants", "plan", "plans", "expect", "expects", "continue", "continues", "start",
            "starts", "allow", "allows", "provide", "provides", "create", "creates", "build",
            "builds", "built", "reach", "reaches", "hit", "hits", "achieve", "achieves",
            "resolve", "resolves", "use", "uses", "using", "run", "runs", "ran", "keep",
            "keeps", "kept", "bring", "brings", "brought", "meet", "meets", "met", "say",
            "says", "said", "think", "thinks", "thought", "feel", "feels", "felt", "let",
            "lets", "put", "puts", "set", "sets", "aim", "aims", "learn", "learns", "learnt",
            "realize", "realizes", "manage", "manages", "own", "owns", "belongs",
        ]
        .into_iter()
        .collect();

        let ly_nouns = [
            "quarterly", "monthly", "weekly", "yearly", "daily", "early", "family", "supply",
            "italy", "july", "reply", "assembly", "anomaly", "rally", "ally", "fly", "apply",
            "monopoly",
        ]
        .into_iter()
        .collect();

        let participle_nouns = [
            "speed", "need", "seed", "feed", "breed", "greed", "hundred", "red", "shed",
            "engineering", "marketing", "pricing", "onboarding", "training", "planning",
            "funding", "spending", "building", "meeting", "offering", "thing", "spring",
            "morning", "evening", "ceiling", "string", "setting", "billing", "shipping",
            "hiring", "staffing", "budgeting", "forecasting", "reporting", "testing",
            "tooling", "messaging", "branding", "learning", "understanding", "ticketing",
            "accounting", "consulting", "manufacturing", "recruiting", "customer-facing",
        ]
        .into_iter()
        .collect();

        let titles = ["Mr", "Mrs", "Ms", "Dr", "Prof", "Sir", "Dame", "Mx"]
            .into_iter()
            .collect();

        let first_names = [
            "Sarah", "John", "Maria", "Michael", "David", "James", "Robert", "Mary", "Jennifer",
            "Linda", "Elizabeth", "William", "Richard", "Joseph", "Thomas", "Charles", "Lisa",
            "Emily", "Emma", "Olivia", "Anna", "Alex", "Chris", "Daniel", "Laura", "Mark",
            "Paul", "Peter", "Susan", "Karen", "Nancy", "Kevin", "Brian", "Jessica", "Rachel",
            "Priya", "Wei", "Ahmed", "Carlos", "Sofia", "Mike", "Tom", "Jane", "Kate", "Sam",
        ]
        .into_iter()
        .collect();

        let places = [
            "Europe", "Asia", "Africa", "America", "North America", "South America",
            "Latin America", "EMEA", "APAC", "LATAM", "Germany", "France", "Spain", "Italy",
            "Japan", "China", "India", "Canada", "Brazil", "Mexico", "Australia", "London",
            "Paris", "Berlin", "Tokyo", "New York", "San Francisco", "Seattle", "Boston",
            "Chicago", "Austin", "Texas", "California", "Singapore", "Dublin", "Toronto",
            "United States", "United Kingdom", "UK", "USA",
        ]
        .into_iter()
        .collect();

        let org_indicators = [
            "Inc", "LLC", "Ltd", "Corp", "Corporation", "Company", "Co", "Group", "Holdings",
            "Partners", "Association", "Foundation", "Institute", "University", "College",
            "School", "Bank", "Trust", "Fund", "Team", "Department", "Labs", "Agency",
        ]
        .into_iter()
        .collect();

        let location_indicators = [
            "Street", "Avenue", "Boulevard", "Road", "Drive", "Lane", "Way", "Place", "City",
            "Town", "Village", "County", "State", "Province", "Country", "Building", "Floor",
            "Suite", "Room", "Region",
        ]
        .into_iter()
        .collect();

        let place_prepositions = ["in", "at", "from", "near", "across", "throughout"]
            .into_iter()
            .collect();

        Self {
            determiners,
            function_words,
            verbs,
            ly_nouns,
            participle_nouns,
            titles,
            first_names,
            places,
            org_indicators,
            location_indicators,
            place_prepositions,
        }
    }

    pub fn is_determiner(&self, word: &str) -> bool {
        self.determiners.contains(word.to_lowercase().as_str())
    }

    pub fn is_function_word(&self, word: &str) -> bool {
        self.function_words.contains(normalize(word).as_str())
    }

    pub fn is_verb(&self, word: &str) -> bool {
        self.verbs.contains(word.to_lowercase().as_str())
    }

    /// `-ly` words other than the known nouns and adjectives.
    pub fn is_adverb(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        lower.chars().count() >= 4 && lower.ends_with("ly") && !self.ly_nouns.contains(lower.as_str())
    }

    /// `-ed` / `-ing` forms that read as verbs unless a determiner precedes them.
    pub fn is_participle(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        if self.participle_nouns.contains(lower.as_str()) {
            return false;
        }
        let len = lower.chars().count();
        (len >= 5 && lower.ends_with("ed")) || (len >= 5 && lower.ends_with("ing"))
    }

    pub fn is_title(&self, word: &str) -> bool {
        self.titles.contains(word)
    }

    pub fn is_first_name(&self, word: &str) -> bool {
        self.first_names.contains(word)
    }

    pub fn is_place(&self, name: &str) -> bool {
        self.places.contains(name)
    }

    pub fn is_org_indicator(&self, word: &str) -> bool {
        self.org_indicators.contains(word)
    }

    pub fn is_location_indicator(&self, word: &str) -> bool {
        self.location_indicators.contains(word)
    }

    pub fn is_place_preposition(&self, word: &str) -> bool {
        self.place_prepositions.contains(word.to_lowercase().as_str())
    }
}

/// Lowercase and fold the typographic apostrophe so "we’re" matches "we're".
fn normalize(word: &str) -> String {
    word.to_lowercase().replace('\u{2019}', "'")
}
