mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::*;
use molecule_finder::api::create_router;
use molecule_finder::models::{DescriptorSet, ResolutionResult};
use serde_json::Value;

fn setup(db: StubDatabase, wiki: StubEncyclopedia) -> TestServer {
    let resolver = resolver(&Arc::new(db), &Arc::new(wiki));
    let app = create_router(Arc::new(resolver));
    TestServer::new(app).expect("Failed to create test server")
}

fn aspirin_server() -> TestServer {
    setup(
        StubDatabase::empty().with_smiles(vec![aspirin_record()]),
        StubEncyclopedia::empty().with_page(ASPIRIN_IUPAC, "Aspirin is a medication."),
    )
}

mod health {
    use super::*;

    #[tokio::test]
    async fn returns_ok() {
        let server = setup(StubDatabase::empty(), StubEncyclopedia::empty());
        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

mod molecules {
    use super::*;

    #[tokio::test]
    async fn returns_full_resolution() {
        let server = aspirin_server();
        let response = server
            .get("/api/v1/molecules")
            .add_query_param("smiles", ASPIRIN)
            .await;

        response.assert_status_ok();
        let result: ResolutionResult = response.json();
        assert_eq!(result.input, ASPIRIN);
        assert!((result.descriptors.molecular_weight - 180.16).abs() < 0.01);
        assert_eq!(result.encyclopedia.summary, "Aspirin is a medication.");
        assert_eq!(result.database.unwrap().molecular_formula, "C9H8O4");
    }

    #[tokio::test]
    async fn absent_database_entry_serializes_as_null() {
        let server = setup(StubDatabase::empty(), StubEncyclopedia::empty());
        let response = server
            .get("/api/v1/molecules")
            .add_query_param("smiles", "CCO")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["database"].is_null());
        assert_eq!(body["encyclopedia"]["summary"], "No Wikipedia summary available.");
    }

    #[tokio::test]
    async fn rejects_invalid_structure() {
        let server = aspirin_server();
        let response = server
            .get("/api/v1/molecules")
            .add_query_param("smiles", "C1CC")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid SMILES string.");
    }

    #[tokio::test]
    async fn rejects_out_of_range_charge() {
        let server = aspirin_server();
        let response = server
            .get("/api/v1/molecules")
            .add_query_param("smiles", "[C-2147483648]")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid SMILES string.");
    }

    #[tokio::test]
    async fn rejects_missing_parameter() {
        let server = aspirin_server();
        let response = server.get("/api/v1/molecules").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_blank_parameter() {
        let server = aspirin_server();
        let response = server
            .get("/api/v1/molecules")
            .add_query_param("smiles", "  ")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

mod descriptors {
    use super::*;

    #[tokio::test]
    async fn returns_local_descriptors() {
        let server = aspirin_server();
        let response = server
            .get("/api/v1/descriptors")
            .add_query_param("smiles", "c1ccccc1")
            .await;

        response.assert_status_ok();
        let set: DescriptorSet = response.json();
        assert!((set.molecular_weight - 78.11).abs() < 0.01);
        assert!((set.logp - 1.6866).abs() < 0.01);
    }

    #[tokio::test]
    async fn rejects_invalid_structure() {
        let server = aspirin_server();
        let response = server
            .get("/api/v1/descriptors")
            .add_query_param("smiles", "C(C")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

mod page {
    use super::*;

    #[tokio::test]
    async fn renders_empty_form() {
        let server = aspirin_server();
        let response = server.get("/").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Molecule Information Finder"));
        assert!(html.contains("name=\"smiles\""));
        assert!(!html.contains("Molecular Properties"));
    }

    #[tokio::test]
    async fn renders_results() {
        let server = aspirin_server();
        let response = server.get("/").add_query_param("smiles", ASPIRIN).await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Results retrieved successfully!"));
        assert!(html.contains("180.16 g/mol"));
        assert!(html.contains("Aspirin is a medication."));
        assert!(html.contains("https://pubchem.ncbi.nlm.nih.gov/compound/2244"));
    }

    #[tokio::test]
    async fn invalid_structure_shows_error_banner() {
        let server = aspirin_server();
        let response = server.get("/").add_query_param("smiles", "C1CC").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Invalid SMILES string."));
        assert!(!html.contains("Molecular Properties"));
    }

    #[tokio::test]
    async fn missing_database_entry_shows_warning() {
        let server = setup(StubDatabase::empty(), StubEncyclopedia::empty());
        let response = server.get("/").add_query_param("smiles", "CCO").await;

        let html = response.text();
        assert!(html.contains("No PubChem data found. Try a different SMILES."));
    }
}
