//! End-to-end behavior of the article store's cache tiers.

use std::fs;
use std::path::PathBuf;

use lightcms_renderer::OutlineRenderer;
use lightcms_site::{
    ArticleStore, CacheMode, CacheSettings, ListOptions, Listing, Origin, StoreConfig,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const FIRST: &str =
    "{Author}{J Doe}\n{Title}{_my first post}\n{Date}{05/03/2021}\n---\n*Intro\nHello world.\n";

fn article(title: &str, date: &str, body: &str) -> String {
    format!("{{Author}}{{A Writer}}\n{{Title}}{{{title}}}\n{{Date}}{{{date}}}\n---\n{body}")
}

struct Site {
    tmp: TempDir,
}

impl Site {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("scripts")).unwrap();
        fs::create_dir(tmp.path().join("templates")).unwrap();
        Self { tmp }
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.tmp.path().join("scripts").join(name), content).unwrap();
    }

    fn cache_dir(&self) -> PathBuf {
        self.tmp.path().join(".cache")
    }

    fn open(&self, limit: usize, mode: CacheMode) -> ArticleStore {
        self.open_with(limit, mode, OutlineRenderer::new())
    }

    fn open_with(&self, limit: usize, mode: CacheMode, renderer: OutlineRenderer) -> ArticleStore {
        let mut settings = CacheSettings::new(self.cache_dir());
        settings.limit = limit;
        settings.mode = mode;
        let config = StoreConfig::new(
            self.tmp.path().join("scripts"),
            self.tmp.path().join("templates"),
        )
        .with_cache(settings)
        .with_renderer(renderer);
        ArticleStore::open(config).unwrap()
    }
}

#[test]
fn test_example_document_end_to_end() {
    let site = Site::new();
    site.write("first-post", FIRST);
    let store = site.open(10, CacheMode::Reset);

    let doc = store.get_document("first-post").unwrap();

    assert_eq!(doc.title(), "my first post");
    assert_eq!(doc.date(), "05. Mar 2021");
    assert_eq!(doc.author(), "J Doe");
    assert_eq!(
        doc.content(),
        Some("<h2 id='1'>1 - Intro</h2><p>Hello world.</p>")
    );
    assert_eq!(
        doc.table_of_contents(),
        Some("<ul><li><a href='#1'>1 - Intro</a></li></ul>")
    );
}

#[test]
fn test_durable_reload_after_eviction_equals_fresh_parse() {
    let site = Site::new();
    site.write("a", &article("alpha", "01/02/2020", "*Intro\nx\\\\y\n**_Sub\nz\n"));
    site.write("b", &article("beta", "02/02/2020", "*Only\n"));
    let store = site.open(1, CacheMode::Reset);

    let fresh = store.fetch("a").unwrap();
    assert_eq!(fresh.origin, Origin::Parsed);
    assert_eq!(store.fetch("b").unwrap().origin, Origin::Parsed);

    let reloaded = store.fetch("a").unwrap();
    assert_eq!(reloaded.origin, Origin::Durable);
    assert_eq!(reloaded.digest, fresh.digest);
    assert_eq!(*reloaded.document, *fresh.document);
    assert_eq!(reloaded.document.sort_date(), fresh.document.sort_date());
    assert_eq!(reloaded.document.original_date(), "01/02/2020");

    // Promoted back into the hot tier.
    assert_eq!(store.fetch("a").unwrap().origin, Origin::Hot);
}

#[test]
fn test_markdown_document_survives_durable_reload() {
    let site = Site::new();
    site.write(
        "md",
        "{Author}{a}\n{Title}{t}\n{Date}{01/01/2020}\n{Filetype}{Markdown}\n---\n# Heading\n\n*emphasis*\n",
    );
    site.write("other", FIRST);
    let store = site.open(1, CacheMode::Reset);

    let fresh = store.fetch("md").unwrap();
    store.fetch("other").unwrap();
    let reloaded = store.fetch("md").unwrap();

    assert_eq!(reloaded.origin, Origin::Durable);
    assert_eq!(reloaded.document.table_of_contents(), None);
    assert_eq!(*reloaded.document, *fresh.document);
}

#[test]
fn test_changed_byte_forces_reparse() {
    let site = Site::new();
    site.write("post", &article("post", "01/01/2021", "*Intro\nversion one\n"));
    let store = site.open(10, CacheMode::Reset);

    let before = store.fetch("post").unwrap();
    assert_eq!(store.fetch("post").unwrap().origin, Origin::Hot);

    site.write("post", &article("post", "01/01/2021", "*Intro\nversion two\n"));
    let after = store.fetch("post").unwrap();

    assert_eq!(after.origin, Origin::Parsed);
    assert_ne!(after.digest, before.digest);
    assert_eq!(
        after.document.content(),
        Some("<h2 id='1'>1 - Intro</h2><p>version two</p>")
    );
    assert_eq!(store.fetch("post").unwrap().origin, Origin::Hot);
}

#[test]
fn test_hot_tier_evicts_least_hit_document() {
    let site = Site::new();
    for name in ["a", "b", "c"] {
        site.write(name, &article(name, "01/01/2021", "*S\n"));
    }
    let store = site.open(2, CacheMode::Reset);

    store.fetch("a").unwrap();
    store.fetch("b").unwrap();
    // Two hits on "a", none on "b".
    store.fetch("a").unwrap();
    store.fetch("a").unwrap();

    assert_eq!(store.fetch("c").unwrap().origin, Origin::Parsed);
    assert_eq!(store.fetch("a").unwrap().origin, Origin::Hot);
    assert_eq!(store.fetch("b").unwrap().origin, Origin::Durable);
}

#[test]
fn test_resume_trusts_existing_records() {
    let site = Site::new();
    site.write("first", FIRST);
    drop(site.open(10, CacheMode::Reset).fetch("first").unwrap());

    let resumed = site.open(10, CacheMode::Resume);
    assert_eq!(resumed.fetch("first").unwrap().origin, Origin::Durable);
}

#[test]
fn test_reset_discards_existing_records() {
    let site = Site::new();
    site.write("first", FIRST);
    site.open(10, CacheMode::Reset).fetch("first").unwrap();

    let reset = site.open(10, CacheMode::Reset);
    assert_eq!(reset.fetch("first").unwrap().origin, Origin::Parsed);
}

#[test]
fn test_resumed_record_is_still_validated_against_source() {
    let site = Site::new();
    site.write("first", FIRST);
    site.open(10, CacheMode::Reset).fetch("first").unwrap();

    site.write("first", &FIRST.replace("Hello", "Goodbye"));
    let resumed = site.open(10, CacheMode::Resume);
    let fetched = resumed.fetch("first").unwrap();

    assert_eq!(fetched.origin, Origin::Parsed);
    assert_eq!(
        fetched.document.content(),
        Some("<h2 id='1'>1 - Intro</h2><p>Goodbye world.</p>")
    );
}

#[test]
fn test_resume_with_other_renderer_settings_rerenders() {
    let site = Site::new();
    site.write("first", FIRST);
    site.open(10, CacheMode::Reset).fetch("first").unwrap();

    let plain = OutlineRenderer::new().with_numbering(false);
    let resumed = site.open_with(10, CacheMode::Resume, plain);
    let fetched = resumed.fetch("first").unwrap();

    assert_eq!(fetched.origin, Origin::Parsed);
    assert_eq!(
        fetched.document.content(),
        Some("<h2 id='1'>Intro</h2><p>Hello world.</p>")
    );

    // Same settings again: the re-rendered records are resumed.
    let plain = OutlineRenderer::new().with_numbering(false);
    let again = site.open_with(10, CacheMode::Resume, plain);
    assert_eq!(again.fetch("first").unwrap().origin, Origin::Durable);
}

#[test]
fn test_listing_skips_invalid_documents() {
    let site = Site::new();
    site.write("old", &article("old", "01/01/2019", "*A\n"));
    site.write("new", &article("new", "01/01/2022", "*A\n"));
    site.write("broken", "{Author}{a}\n---\n");
    let store = site.open(10, CacheMode::Reset);

    let listing = store.list_documents(&ListOptions::default()).unwrap();
    let Listing::Flat(docs) = listing else {
        panic!("expected a flat listing");
    };
    let names: Vec<&str> = docs.iter().map(|d| d.filename()).collect();
    assert_eq!(names, vec!["new", "old"]);
    assert_eq!(store.names().unwrap(), vec!["broken", "new", "old"]);
}

#[test]
fn test_concurrent_fetches_share_one_store() {
    let site = Site::new();
    for i in 0..8 {
        site.write(&format!("doc{i}"), &article("t", "01/01/2021", "*S\np\n"));
    }
    let store = site.open(4, CacheMode::Reset);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for round in 0..5 {
                    for i in 0..8 {
                        let doc = store.get_document(&format!("doc{i}")).unwrap();
                        assert_eq!(doc.content(), Some("<h2 id='1'>1 - S</h2><p>p</p>"), "{round}");
                    }
                }
            });
        }
    });
}
