use bookproject_core::{Author, Book, PredefinedShelf, PredefinedShelfName};
use proptest::prelude::*;

fn fresh_book() -> Book {
    Book::new(
        "Foundation",
        Author::new("Isaac", "Asimov"),
        PredefinedShelf::new(PredefinedShelfName::Reading),
    )
}

fn expected_suffix(number: i32) -> &'static str {
    match number % 10 {
        1 => "st edition",
        2 => "nd edition",
        3 => "rd edition",
        _ => "th edition",
    }
}

proptest! {
    #[test]
    fn edition_suffix_follows_last_digit(number in any::<i32>()) {
        let mut book = fresh_book();
        book.set_edition(Some(number));
        let edition = book.edition().unwrap();
        prop_assert!(edition.ends_with(expected_suffix(number)));
    }

    #[test]
    fn positive_numbers_ending_in_one_get_st(tens in 0i32..10_000) {
        let mut book = fresh_book();
        book.set_edition(Some(tens * 10 + 1));
        prop_assert!(book.edition().unwrap().ends_with("st edition"));
    }

    #[test]
    fn absent_edition_never_changes_label(seed in proptest::option::of(any::<i32>())) {
        let mut book = fresh_book();
        book.set_edition(seed);
        let before = book.edition().map(str::to_string);
        book.set_edition(None);
        prop_assert_eq!(book.edition().map(str::to_string), before);
    }

    #[test]
    fn series_position_exists_iff_positive(position in proptest::option::of(any::<i32>())) {
        let mut book = fresh_book();
        book.set_series_position(position);
        prop_assert_eq!(
            book.series_position_exists(),
            matches!(position, Some(value) if value > 0)
        );
    }
}
