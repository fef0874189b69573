//! Utility functions for naming generated TypeScript declarations.
//!
//! Nested messages and enums surface as flat top-level declarations, so a
//! package and nesting path like `acme` / `Outer.Inner` flattens to the
//! single identifier `Acme_Outer_Inner`. Flattening is one-way: `A.B_C` and
//! `A_B.C` collide, which the registry detects at registration time.

use itertools::Itertools;

/// Uppercases the first character of `s`, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first character of `s`, leaving the rest untouched. Method
/// names are `UpperCamel` in the descriptor and `lowerCamel` on the client.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns the identifier prefix contributed by a package name: `acme`
/// becomes `Acme`, `foo.bar` becomes `Foo_bar`. An empty package contributes
/// no prefix.
pub fn package_prefix(package: &str) -> String {
    join_segments(package.split('.'))
}

/// Flattens a nesting path into the top-level identifier its declaration is
/// emitted under, e.g. `("acme", ["Outer", "Inner"])` into `Acme_Outer_Inner`.
pub fn flat_name<S>(package: &str, path: &[S]) -> String
where
    S: AsRef<str>,
{
    std::iter::once(package_prefix(package))
        .filter(|prefix| !prefix.is_empty())
        .chain(path.iter().map(|segment| segment.as_ref().to_owned()))
        .join("_")
}

/// Flattens a fully qualified descriptor reference (e.g. `.acme.Outer.Inner`)
/// into the same identifier [`flat_name`] produced for its declaration. A
/// qualified reference cannot distinguish package segments from nesting
/// segments, so only the first segment takes the package capitalization.
pub fn flat_name_of_type_name(type_name: &str) -> String {
    join_segments(type_name.trim_start_matches('.').split('.'))
}

fn join_segments<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    segments
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(idx, segment)| {
            if idx == 0 {
                capitalize(segment)
            } else {
                segment.to_owned()
            }
        })
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!("", &capitalize(""));
        assert_eq!("A", &capitalize("a"));
        assert_eq!("Acme", &capitalize("acme"));
        assert_eq!("AcmeWeb", &capitalize("acmeWeb"));
        assert_eq!("Acme", &capitalize("Acme"));
    }

    #[test]
    fn test_lower_first() {
        assert_eq!("", &lower_first(""));
        assert_eq!("ping", &lower_first("Ping"));
        assert_eq!("makeOrder", &lower_first("MakeOrder"));
        assert_eq!("ping", &lower_first("ping"));
    }

    #[test]
    fn test_package_prefix() {
        assert_eq!("", &package_prefix(""));
        assert_eq!("Acme", &package_prefix("acme"));
        assert_eq!("Foo_bar", &package_prefix("foo.bar"));
    }

    #[test]
    fn test_flat_name() {
        assert_eq!("Acme_Foo", &flat_name("acme", &["Foo"]));
        assert_eq!("Acme_Outer_Inner", &flat_name("acme", &["Outer", "Inner"]));
        assert_eq!("Foo_bar_Msg", &flat_name("foo.bar", &["Msg"]));
        assert_eq!("Foo", &flat_name("", &["Foo"]));
        assert_eq!("Outer_Inner", &flat_name("", &["Outer", "Inner"]));
    }

    #[test]
    fn test_flat_name_of_type_name() {
        assert_eq!("Acme_Foo", &flat_name_of_type_name(".acme.Foo"));
        assert_eq!(
            "Acme_Outer_Inner",
            &flat_name_of_type_name(".acme.Outer.Inner")
        );
        assert_eq!("P_A_B_N", &flat_name_of_type_name(".p.A.B.N"));
        assert_eq!("Foo", &flat_name_of_type_name(".Foo"));
    }

    #[test]
    fn declaration_and_reference_names_agree() {
        assert_eq!(
            flat_name("acme", &["Outer", "Inner"]),
            flat_name_of_type_name(".acme.Outer.Inner"),
        );
        assert_eq!(
            flat_name("foo.bar", &["Msg"]),
            flat_name_of_type_name(".foo.bar.Msg"),
        );
    }
}
