use bookproject_core::{
    Author, Book, BookValidationError, EntityId, Genre, PredefinedShelf, PredefinedShelfName,
    RatingScale, Tag,
};
use chrono::NaiveDate;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

fn frank_herbert() -> Author {
    Author::new("Frank", "Herbert")
}

fn to_read() -> PredefinedShelf {
    PredefinedShelf::new(PredefinedShelfName::ToRead)
}

fn hash_of(book: &Book) -> u64 {
    let mut hasher = DefaultHasher::new();
    book.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn new_sets_three_fields_and_leaves_the_rest_empty() {
    let book = Book::new("Dune", frank_herbert(), to_read());

    assert_eq!(book.id(), None);
    assert_eq!(book.title(), "Dune");
    assert_eq!(book.author(), &frank_herbert());
    assert_eq!(book.predefined_shelf(), Some(&to_read()));
    assert_eq!(book.custom_shelf(), None);
    assert_eq!(book.number_of_pages(), None);
    assert_eq!(book.pages_read(), None);
    assert_eq!(book.genre(), None);
    assert_eq!(book.series_position(), None);
    assert_eq!(book.edition(), None);
    assert_eq!(book.book_recommended_by(), None);
    assert!(book.tags().is_empty());
    assert_eq!(book.rating(), None);
    assert_eq!(book.date_started_reading(), None);
    assert_eq!(book.date_finished_reading(), None);
    assert_eq!(book.book_review(), None);
}

#[test]
fn display_uses_fixed_debug_format() {
    let book = Book::new("Dune", frank_herbert(), to_read());
    assert_eq!(book.to_string(), "Book{title='Dune'}");
}

#[test]
fn set_edition_picks_suffix_from_last_digit() {
    let cases = [
        (1, "st edition"),
        (2, "nd edition"),
        (3, "rd edition"),
        (4, "th edition"),
        (10, "th edition"),
        (11, "st edition"),
        (12, "nd edition"),
        (13, "rd edition"),
        (21, "st edition"),
        (22, "nd edition"),
        (0, "th edition"),
    ];
    for (number, expected) in cases {
        let mut book = Book::new("Dune", frank_herbert(), to_read());
        book.set_edition(Some(number));
        let edition = book.edition().unwrap();
        assert!(
            edition.ends_with(expected),
            "edition {number} produced `{edition}`"
        );
    }
}

#[test]
fn set_edition_on_fresh_book_starts_from_empty_label() {
    let mut book = Book::new("Dune", frank_herbert(), to_read());
    book.set_edition(Some(2));
    assert_eq!(book.edition(), Some(" nd edition"));
}

#[test]
fn set_edition_builds_on_previously_stored_label() {
    let mut book = Book::new("Dune", frank_herbert(), to_read());
    book.set_edition(Some(1));
    book.set_edition(Some(3));
    assert_eq!(book.edition(), Some(" st edition rd edition"));
}

#[test]
fn set_edition_none_keeps_existing_label() {
    let mut book = Book::new("Dune", frank_herbert(), to_read());
    book.set_edition(None);
    assert_eq!(book.edition(), None);

    book.set_edition(Some(4));
    let before = book.edition().map(str::to_string);
    book.set_edition(None);
    assert_eq!(book.edition().map(str::to_string), before);
}

#[test]
fn set_edition_accepts_negative_numbers() {
    let mut book = Book::new("Dune", frank_herbert(), to_read());
    book.set_edition(Some(-1));
    assert!(book.edition().unwrap().ends_with("th edition"));
}

#[test]
fn series_position_exists_only_for_positive_values() {
    let mut book = Book::new("Dune", frank_herbert(), to_read());
    assert!(!book.series_position_exists());

    book.set_series_position(Some(0));
    assert!(!book.series_position_exists());

    book.set_series_position(Some(-3));
    assert!(!book.series_position_exists());

    book.set_series_position(Some(1));
    assert!(book.series_position_exists());
}

#[test]
fn equality_ignores_tags() {
    let mut first = Book::new("Dune", frank_herbert(), to_read());
    let mut second = first.clone();
    first.add_tag(Tag::new("classic").unwrap());
    second.set_tags(BTreeSet::from([
        Tag::new("space").unwrap(),
        Tag::new("desert").unwrap(),
    ]));

    assert_eq!(first, second);
    assert_eq!(hash_of(&first), hash_of(&second));
}

#[test]
fn equality_considers_core_fields() {
    let first = Book::new("Dune", frank_herbert(), to_read());
    let mut retitled = first.clone();
    retitled.set_title("Dune Messiah");
    assert_ne!(first, retitled);

    let mut rated = first.clone();
    rated.set_rating(Some(RatingScale::Nine));
    assert_ne!(first, rated);

    let mut stored = first.clone();
    stored.assign_id(EntityId::generate()).unwrap();
    assert_ne!(first, stored);
}

#[test]
fn assign_id_is_rejected_once_set() {
    let mut book = Book::new("Dune", frank_herbert(), to_read());
    let id = EntityId::generate();
    book.assign_id(id).unwrap();
    assert!(book.assign_id(EntityId::generate()).is_err());
    assert_eq!(book.id(), Some(id));
}

#[test]
fn validate_rejects_empty_title_only_at_validation() {
    let book = Book::new("", frank_herbert(), to_read());
    assert_eq!(book.title(), "");
    assert_eq!(book.validate(), Err(BookValidationError::EmptyTitle));

    let ok = Book::new("Dune", frank_herbert(), to_read());
    assert_eq!(ok.validate(), Ok(()));
}

#[test]
fn finished_date_before_start_date_is_accepted() {
    let mut book = Book::new("Dune", frank_herbert(), to_read());
    book.set_date_started_reading(NaiveDate::from_ymd_opt(2024, 5, 10));
    book.set_date_finished_reading(NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!(book.validate(), Ok(()));
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let mut book = Book::new("Dune", frank_herbert(), to_read());
    book.set_genre(Some(Genre::ScienceFiction));
    book.set_rating(Some(RatingScale::Ten));
    book.set_date_finished_reading(NaiveDate::from_ymd_opt(2024, 1, 31));
    book.add_tag(Tag::new("Classic").unwrap());

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["id"], serde_json::Value::Null);
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["genre"], "science_fiction");
    assert_eq!(json["rating"], "ten");
    assert_eq!(json["date_finished_reading"], "2024-01-31");
    assert_eq!(json["predefined_shelf"]["shelf_name"], "to_read");
    assert_eq!(json["tags"][0]["name"], "classic");

    let decoded: Book = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, book);
    assert_eq!(decoded.tags(), book.tags());
}

#[test]
fn decoding_rejects_empty_title() {
    let book = Book::new("Dune", frank_herbert(), to_read());
    let mut json = serde_json::to_value(&book).unwrap();
    json["title"] = serde_json::Value::from("");

    let err = serde_json::from_value::<Book>(json).unwrap_err();
    assert!(err.to_string().contains("book title must not be empty"));
}

#[test]
fn decoding_keeps_edition_label_verbatim_and_normalizes_tags() {
    let book = Book::new("Dune", frank_herbert(), to_read());
    let mut json = serde_json::to_value(&book).unwrap();
    json["edition"] = serde_json::Value::from("2nd edition");
    json["tags"] = serde_json::json!([{ "id": null, "name": " Classic " }]);

    let decoded: Book = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.edition(), Some("2nd edition"));
    assert_eq!(
        decoded.tags().iter().map(Tag::name).collect::<Vec<_>>(),
        vec!["classic"]
    );
}

#[test]
fn decoding_rejects_blank_tag_name() {
    let book = Book::new("Dune", frank_herbert(), to_read());
    let mut json = serde_json::to_value(&book).unwrap();
    json["tags"] = serde_json::json!([{ "id": null, "name": "   " }]);

    let err = serde_json::from_value::<Book>(json).unwrap_err();
    assert!(err.to_string().contains("tag name must not be blank"));
}
