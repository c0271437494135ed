//! Field and filter names accepted by each VNDB Kana endpoint, and the
//! per-tool usage guidance shown to the model.

use crate::record::EntityKind;

pub(crate) const VN_FIELDS: &[&str] = &[
    "id", "title", "alttitle", "titles.lang", "titles.title", "titles.latin", "titles.official",
    "titles.main", "aliases", "olang", "devstatus", "released", "languages", "platforms",
    "image.id", "image.url", "image.dims", "image.sexual", "image.violence", "image.votecount",
    "image.thumbnail", "image.thumbnail_dims", "length", "length_minutes", "length_votes",
    "description", "average", "rating", "votecount", "screenshots.id", "screenshots.url",
    "screenshots.dims", "screenshots.sexual", "screenshots.violence", "screenshots.votecount",
    "screenshots.release.id", "relations.relation", "relations.relation_official",
    "relations.id", "relations.title", "tags.rating", "tags.spoiler", "tags.lie", "tags.id",
    "tags.name", "developers.id", "developers.name", "editions.eid", "editions.lang",
    "editions.name", "editions.official", "staff.eid", "staff.role", "staff.note", "staff.id",
    "staff.name", "va.note", "va.staff.id", "va.staff.name", "va.character.id",
    "va.character.name", "extlinks.url", "extlinks.label", "extlinks.name", "extlinks.id",
];

pub(crate) const CHARACTER_FIELDS: &[&str] = &[
    "id", "name", "original", "aliases", "description", "image.id", "image.url", "blood_type",
    "height", "weight", "bust", "waist", "hips", "cup", "age", "birthday", "sex", "gender",
    "vns.spoiler", "vns.role", "vns.id", "vns.title", "vns.release.id", "traits.spoiler",
    "traits.lie", "traits.id", "traits.name",
];

pub(crate) const RELEASE_FIELDS: &[&str] = &[
    "id", "title", "alttitle", "languages.lang", "languages.title", "languages.latin",
    "languages.mtl", "languages.main", "platforms", "media.medium", "media.qty", "vns.rtype",
    "vns.id", "vns.title", "producers.developer", "producers.publisher", "producers.id",
    "producers.name", "images.id", "images.url", "images.dims", "images.sexual",
    "images.violence", "images.votecount", "images.type", "images.vn", "images.languages",
    "images.photo", "released", "minage", "patch", "freeware", "uncensored", "official",
    "has_ero", "resolution", "engine", "voiced", "notes", "gtin", "catalog", "extlinks.url",
    "extlinks.label", "extlinks.name", "extlinks.id",
];

pub(crate) const PRODUCER_FIELDS: &[&str] = &[
    "id", "name", "original", "aliases", "lang", "type", "description", "extlinks.url",
    "extlinks.label", "extlinks.name", "extlinks.id",
];

pub(crate) const STAFF_FIELDS: &[&str] = &[
    "id", "aid", "ismain", "name", "original", "lang", "gender", "description", "extlinks.url",
    "extlinks.label", "extlinks.name", "extlinks.id", "aliases.aid", "aliases.name",
    "aliases.latin", "aliases.ismain",
];

pub(crate) const TAG_FIELDS: &[&str] = &[
    "id", "name", "aliases", "description", "category", "searchable", "applicable", "vn_count",
];

pub(crate) const TRAIT_FIELDS: &[&str] = &[
    "id", "name", "aliases", "description", "searchable", "applicable", "sexual", "group_id",
    "group_name", "char_count",
];

pub(crate) const QUOTE_FIELDS: &[&str] = &[
    "id", "quote", "score", "vn.id", "vn.title", "character.id", "character.name",
];

pub(crate) const VN_FILTERS: &[&str] = &[
    "id", "search", "lang", "olang", "platform", "length", "released", "rating", "votecount",
    "has_description", "has_anime", "has_screenshot", "has_review", "devstatus", "tag", "dtag",
    "anime_id", "label", "release", "character", "staff", "developer",
];

pub(crate) const CHARACTER_FILTERS: &[&str] = &[
    "id", "search", "role", "blood_type", "sex", "sex_spoil", "gender", "gender_spoil", "height",
    "weight", "bust", "waist", "hips", "cup", "age", "trait", "dtrait", "birthday", "seiyuu", "vn",
];

pub(crate) const RELEASE_FILTERS: &[&str] = &[
    "id", "search", "lang", "platform", "released", "resolution", "resolution_aspect", "minage",
    "medium", "voiced", "engine", "rtype", "extlink", "patch", "freeware", "uncensored",
    "official", "has_ero", "vn", "producer",
];

pub(crate) const PRODUCER_FILTERS: &[&str] = &["id", "search", "lang", "type", "extlink"];

pub(crate) const STAFF_FILTERS: &[&str] =
    &["id", "aid", "search", "lang", "gender", "role", "extlink", "ismain"];

pub(crate) const TAG_FILTERS: &[&str] = &["id", "search", "category"];

pub(crate) const TRAIT_FILTERS: &[&str] = &["id", "search"];

pub(crate) const QUOTE_FILTERS: &[&str] = &["random", "vn", "character"];

pub(crate) fn valid_fields(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::VisualNovel => VN_FIELDS,
        EntityKind::Character => CHARACTER_FIELDS,
        EntityKind::Release => RELEASE_FIELDS,
        EntityKind::Producer => PRODUCER_FIELDS,
        EntityKind::Staff => STAFF_FIELDS,
        EntityKind::Tag => TAG_FIELDS,
        EntityKind::Trait => TRAIT_FIELDS,
        EntityKind::Quote => QUOTE_FIELDS,
    }
}

pub(crate) fn valid_filters(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::VisualNovel => VN_FILTERS,
        EntityKind::Character => CHARACTER_FILTERS,
        EntityKind::Release => RELEASE_FILTERS,
        EntityKind::Producer => PRODUCER_FILTERS,
        EntityKind::Staff => STAFF_FILTERS,
        EntityKind::Tag => TAG_FILTERS,
        EntityKind::Trait => TRAIT_FILTERS,
        EntityKind::Quote => QUOTE_FILTERS,
    }
}

pub(crate) fn tool_description(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::VisualNovel => "Queries the VNDB database for visual novel (VN) entries.",
        EntityKind::Character => "Queries the VNDB database for character entries.",
        EntityKind::Release => "Queries the VNDB database for release entries.",
        EntityKind::Producer => {
            "Queries the VNDB database for producer (developer/publisher) entries."
        }
        EntityKind::Staff => {
            "Queries the VNDB database for staff entries (artists, writers, voice actors). \
             Entries are per staff name, not per person: someone with several aliases can \
             appear several times. Use the 'ismain' filter to get one entry per person."
        }
        EntityKind::Tag => {
            "Queries for content, technical, or sexual content tags applied to visual novels."
        }
        EntityKind::Trait => "Queries for traits applied to characters.",
        EntityKind::Quote => "Queries for quotes from visual novels.",
    }
}

pub(crate) fn sort_keys(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::VisualNovel => "'id', 'title', 'released', 'rating', 'votecount', 'searchrank'",
        EntityKind::Character | EntityKind::Producer | EntityKind::Staff => {
            "'id', 'name', 'searchrank'"
        }
        EntityKind::Release => "'id', 'title', 'released', 'searchrank'",
        EntityKind::Tag => "'id', 'name', 'vn_count', 'searchrank'",
        EntityKind::Trait => "'id', 'name', 'char_count', 'searchrank'",
        EntityKind::Quote => "'id', 'score'",
    }
}

/// Extra rules appended to the `filters` parameter description
pub(crate) fn filter_guidance(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::VisualNovel => concat!(
            "\n- CRITICAL: there is no 'name' filter for visual novels. Find a VN by title with 'search', e.g. '[\"search\", \"=\", \"Steins;Gate\"]'.",
            "\n- CRITICAL: filter by developer with the singular 'developer' filter and a nested producer filter, e.g. '[\"developer\", \"=\", [\"id\", \"=\", \"p98\"]]'. It is 'developer', NOT 'developers'.",
            "\n- CRITICAL 'tag' filter: pass the tag ID directly, never a nested 'id' filter. Correct: '[\"tag\", \"=\", \"g192\"]'. Incorrect: '[\"tag\", \"=\", [\"id\", \"=\", \"g192\"]]'.",
            "\n- SPOILER TAGS: to include spoiler tags pass [tag_id, max_spoiler_level, min_tag_rating]; max_spoiler_level is 0 (none), 1 (minor) or 2 (major), min_tag_rating is 0 to 3. '[\"tag\", \"=\", [\"g192\", 2, 0]]' matches the tag at any spoiler level, while '[\"tag\", \"=\", \"g192\"]' means [\"g192\", 0, 0] and misses most spoilers.",
            "\n- CRITICAL: 'role' is not a VN filter; it belongs to characters and staff and must be nested.",
            "\n- Filter by staff member with a nested staff filter, e.g. '[\"staff\", \"=\", [\"search\", \"=\", \"Urobuchi Gen\"]]'.",
            "\n- Filter by staff role with a nested 'role' filter; roles are \"staff\", \"art\", \"director\", \"chardesign\", \"qa\", \"songs\", \"music\", \"scenario\", \"editor\", \"translator\". Example: '[\"staff\", \"=\", [\"role\", \"=\", \"director\"]]'.",
            "\n- Combine filters with 'and'/'or' and operators such as '>=', '<=', '!='. Example: '[\"and\", [\"or\", [\"lang\", \"=\", \"en\"], [\"lang\", \"=\", \"de\"]], [\"olang\", \"!=\", \"ja\"], [\"release\", \"=\", [\"and\", [\"released\", \">=\", \"2020-01-01\"], [\"producer\", \"=\", [\"id\", \"=\", \"p30\"]]]]]'.",
        ),
        EntityKind::Character => concat!(
            "\n- CRITICAL: there is no 'name' filter for characters. Find a character by name with 'search', e.g. '[\"search\", \"=\", \"Luna\"]'.",
            "\n- CRITICAL: characters cannot be filtered by VN title. First use 'queryVn' to find the VN ID, then use the 'vn' filter, e.g. '[\"vn\", \"=\", [\"id\", \"=\", \"v17\"]]'.",
            "\n- CRITICAL 'gender' filter: single letters only, \"m\", \"f\", \"o\" (non-binary) or \"a\" (ambiguous).",
            "\n- CRITICAL: 'trait' and 'dtrait' are singular and take trait IDs, never names. First use 'queryTrait' to find the ID. 'trait' also matches child traits; 'dtrait' matches only that exact trait. Prefer 'trait'.",
            "\n- Combine filters with 'and', e.g. '[\"and\", [\"search\", \"=\", \"月望\"], [\"trait\", \"=\", \"i123\"]]'.",
            "\n- SPOILER TRAITS: pass [trait_id, max_spoiler_level] with max_spoiler_level 0, 1 or 2. '[\"trait\", \"=\", [\"i123\", 2]]' matches any spoiler level; '[\"trait\", \"=\", \"i123\"]' means [\"i123\", 0].",
        ),
        EntityKind::Release => concat!(
            "\n- CRITICAL: filter by producer with the singular 'producer' filter and a nested producer filter, e.g. '[\"producer\", \"=\", [\"id\", \"=\", \"p98\"]]'. It is 'producer', NOT 'producers'.",
        ),
        EntityKind::Staff => concat!(
            "\n- CRITICAL 'ismain' filter: use '[\"ismain\", \"=\", 1]' to get one entry per person instead of one per alias, e.g. '[\"and\", [\"ismain\", \"=\", 1], [\"id\", \"=\", \"s81\"]]'.",
        ),
        EntityKind::Trait => concat!(
            " Use the 'search' filter to find traits by name.",
            "\n- CRITICAL: search only for the core descriptor. For \"pink hair\" search \"pink\"; for \"blue eyes\" search \"blue\".",
            "\n- Typical searches: \"pink\", \"blond\", \"student\", \"younger sister\". Example: '[\"search\", \"=\", \"student\"]'.",
        ),
        EntityKind::Quote => {
            " For a random quote use '[\"random\", \"=\", 1]'. Quotes can also be filtered by VN or character ID."
        }
        EntityKind::Producer | EntityKind::Tag => "",
    }
}

/// Extra rules appended to the `fields` parameter description
pub(crate) fn field_guidance(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::VisualNovel => {
            " CRITICAL: object fields such as 'image', 'va' or 'staff' need sub-fields ('image.url', 'va.staff.name', 'staff.name'); the parent alone is invalid."
        }
        EntityKind::Character => {
            " CRITICAL: 'image' needs sub-fields such as 'image.url'. Voice actor (va) info is not available here; query the VN endpoint for it."
        }
        EntityKind::Release | EntityKind::Quote => {
            " Use dot notation for nested fields such as 'vns.title', 'vn.title' or 'character.name'."
        }
        EntityKind::Producer | EntityKind::Staff | EntityKind::Tag | EntityKind::Trait => "",
    }
}

/// `queryVn` and `queryQuote` may be called without filters
pub(crate) fn filters_required(kind: EntityKind) -> bool {
    !matches!(kind, EntityKind::VisualNovel | EntityKind::Quote)
}
