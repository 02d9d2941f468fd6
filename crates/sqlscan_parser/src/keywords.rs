use std::fmt;

/// Try to get a keyword from a string, ignoring string casing.
pub fn keyword_from_str(s: &str) -> Option<Keyword> {
    let s = unicase::Ascii::new(s);
    let idx = match KEYWORD_STRINGS.binary_search(&s) {
        Ok(idx) => idx,
        Err(_) => return None,
    };
    Some(ALL_KEYWORDS[idx])
}

/// Generate an enum of keywords.
///
/// Keywords must be listed in sorted order, lookups binary search the
/// generated string table.
macro_rules! define_keywords {
    ($($ident:ident),*) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($ident),*
        }

        impl Keyword {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Keyword::$ident => stringify!($ident)),*
                }
            }
        }

        pub const ALL_KEYWORDS: &[Keyword] = &[
            $(Keyword::$ident),*
        ];

        pub const KEYWORD_STRINGS: &[unicase::Ascii<&'static str>] = &[
            $(unicase::Ascii::new(stringify!($ident)),)*
        ];
    };
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[rustfmt::skip]
define_keywords!(
    ALL,
    AND,
    ANY,
    ARRAY,
    AS,
    ASC,
    ASSERT_ROWS_MODIFIED,
    AT,
    BETWEEN,
    BY,
    CASE,
    CAST,
    COLLATE,
    CONTAINS,
    CREATE,
    CROSS,
    CUBE,
    CURRENT,
    DEFAULT,
    DEFINE,
    DESC,
    DISTINCT,
    ELSE,
    END,
    ENUM,
    ESCAPE,
    EXCEPT,
    EXCLUDE,
    EXISTS,
    EXTRACT,
    FALSE,
    FETCH,
    FOLLOWING,
    FOR,
    FROM,
    FULL,
    GROUP,
    GROUPING,
    GROUPS,
    HASH,
    HAVING,
    IF,
    IGNORE,
    IN,
    INNER,
    INTERSECT,
    INTERVAL,
    INTO,
    IS,
    JOIN,
    LATERAL,
    LEFT,
    LIKE,
    LIMIT,
    LOOKUP,
    MERGE,
    NATURAL,
    NEW,
    NO,
    NOT,
    NULL,
    NULLS,
    OF,
    ON,
    OR,
    ORDER,
    OUTER,
    OVER,
    PARTITION,
    PRECEDING,
    PRIMARY,
    PROTO,
    RANGE,
    RECURSIVE,
    RESPECT,
    RIGHT,
    ROLLUP,
    ROWS,
    SELECT,
    SET,
    SOME,
    STRUCT,
    TABLE,
    TABLESAMPLE,
    THEN,
    TO,
    TREAT,
    TRUE,
    UNBOUNDED,
    UNION,
    UNNEST,
    USING,
    WHEN,
    WHERE,
    WINDOW,
    WITH,
    WITHIN
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive() {
        // (input, expected)
        let tests = [
            ("select", Some(Keyword::SELECT)),
            ("SeLeCt", Some(Keyword::SELECT)),
            ("SELECT", Some(Keyword::SELECT)),
            ("NOSELECT", None),
            ("order", Some(Keyword::ORDER)),
            ("assert_rows_modified", Some(Keyword::ASSERT_ROWS_MODIFIED)),
            ("key", None),
            ("users", None),
        ];

        for (input, expected) in tests {
            let got = keyword_from_str(input);
            assert_eq!(expected, got, "input: {input}");
        }
    }

    #[test]
    fn keywords_sorted() {
        for pair in KEYWORD_STRINGS.windows(2) {
            assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn every_keyword_round_trips() {
        for kw in ALL_KEYWORDS {
            assert_eq!(Some(*kw), keyword_from_str(kw.as_str()));
        }
    }
}
