use pretty_assertions::assert_eq;
use protein_cli::app::{self, CalculateRequest, HistoryFilter};
use protein_cli::config::{Overrides, Settings};
use protein_core::DbConfig;
use protein_data::default_catalog;

fn calculate_request(protein: &str, source: &str) -> CalculateRequest {
    CalculateRequest {
        protein: protein.to_string(),
        dv: None,
        source: source.to_string(),
        save: true,
    }
}

#[tokio::test]
async fn calculations_survive_in_sqlite_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("history.db");
    let config = DbConfig {
        backend: "sqlite".to_string(),
        connection_string: db_path.display().to_string(),
    };
    let catalog = default_catalog().expect("built-in catalog");
    let registry = app::build_registry();

    {
        let store = registry.create(&config).await.expect("open sqlite store");
        app::calculate(&catalog, &*store, &calculate_request("20", "chicken-breast"))
            .await
            .expect("calculate chicken");
        app::calculate(&catalog, &*store, &calculate_request("30", "Whey Protein Isolate"))
            .await
            .expect("calculate whey");
    }

    let store = registry.create(&config).await.expect("reopen sqlite store");
    let listed = app::history_list(&*store, &HistoryFilter::default())
        .await
        .expect("list history");
    let lines: Vec<_> = listed.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Whey Protein Isolate"), "{listed}");
    assert!(lines[1].contains("Chicken Breast"), "{listed}");
}

#[tokio::test]
async fn export_from_one_backend_imports_into_another() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let catalog = default_catalog().expect("built-in catalog");
    let registry = app::build_registry();
    let sqlite = registry
        .create(&DbConfig {
            backend: "sqlite".to_string(),
            connection_string: dir.path().join("a.db").display().to_string(),
        })
        .await
        .expect("open sqlite store");
    let memory = registry
        .create(&DbConfig {
            backend: "memory".to_string(),
            connection_string: String::new(),
        })
        .await
        .expect("open memory store");

    app::calculate(&catalog, &*sqlite, &calculate_request("25", "egg-whole"))
        .await
        .expect("calculate");
    let json = app::export(&*sqlite).await.expect("export");

    let summary = app::import(&*memory, &json, false).await.expect("import");

    assert_eq!(
        summary,
        "Imported 1 calculations (0 duplicates skipped). History now holds 1."
    );
    let ids = |records: Vec<protein_core::CalculationRecord>| {
        records.into_iter().map(|r| r.id).collect::<Vec<_>>()
    };
    assert_eq!(ids(memory.list().await.unwrap()), ids(sqlite.list().await.unwrap()));
}

#[tokio::test]
async fn unknown_backend_names_available_ones() {
    let result = app::build_registry()
        .create(&DbConfig {
            backend: "postgres".to_string(),
            connection_string: String::new(),
        })
        .await;

    let message = result.err().expect("postgres is not registered").to_string();

    assert!(message.contains("unknown backend 'postgres'"), "{message}");
    assert!(message.contains("memory"), "{message}");
}

#[tokio::test]
async fn config_file_selects_backend_and_catalog() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let catalog_path = dir.path().join("sources.csv");
    std::fs::write(
        &catalog_path,
        "id,name,category,diaas_score,pdcaas_score,description\n\
         tempeh,Tempeh,plant,,0.7,Fermented soybeans\n",
    )
    .expect("write catalog");
    let config_path = dir.path().join("protein-checker.toml");
    std::fs::write(
        &config_path,
        format!(
            "[database]\nbackend = \"memory\"\n\n[catalog]\npath = {:?}\n",
            catalog_path.display().to_string()
        ),
    )
    .expect("write config");

    let settings = Settings::resolve_with_env(
        Overrides {
            config: Some(config_path),
            ..Overrides::default()
        },
        |_| None,
    )
    .expect("resolve settings");
    let catalog = protein_data::load_catalog(settings.catalog_path.as_deref()).expect("load catalog");
    let store = app::build_registry()
        .create(&settings.db)
        .await
        .expect("open store");

    let out = app::calculate(&catalog, &*store, &calculate_request("10", "tempeh"))
        .await
        .expect("calculate");

    assert!(out.contains("Quality score:     0.70 (PDCAAS)"), "{out}");
    assert!(out.contains("Quality-adjusted:  7.0g"), "{out}");
    assert_eq!(store.list().await.unwrap().len(), 1);
}
