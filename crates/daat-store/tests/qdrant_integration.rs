use std::collections::HashMap;

use daat_store::{QdrantOps, VectorPoint, VectorStore};
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

const QDRANT_GRPC_PORT: ContainerPort = ContainerPort::Tcp(6334);
const VECTOR_SIZE: u64 = 4;

fn qdrant_image() -> GenericImage {
    GenericImage::new("qdrant/qdrant", "v1.16.0")
        .with_wait_for(WaitFor::message_on_stdout("gRPC listening"))
        .with_exposed_port(QDRANT_GRPC_PORT)
}

async fn setup() -> (QdrantOps, ContainerAsync<GenericImage>) {
    let container = qdrant_image().start().await.unwrap();
    let port = container.get_host_port_ipv4(6334).await.unwrap();
    let ops = QdrantOps::new(&format!("http://127.0.0.1:{port}"), None).unwrap();
    (ops, container)
}

fn chunk_point(id: u64, vector: Vec<f32>, content: &str) -> VectorPoint {
    VectorPoint {
        id,
        vector,
        payload: HashMap::from([
            ("projectId".into(), serde_json::json!("proj-1")),
            ("filePath".into(), serde_json::json!("docs/x.md")),
            ("chunkIndex".into(), serde_json::json!(0)),
            ("content".into(), serde_json::json!(content)),
            (
                "metadata".into(),
                serde_json::json!({"title": "X", "tags": ["a", "b"]}),
            ),
        ]),
    }
}

#[tokio::test]
#[ignore = "requires Docker for the Qdrant container"]
async fn create_then_list_collection() {
    let (ops, _container) = setup().await;

    VectorStore::create_collection(&ops, "project_proj-1", VECTOR_SIZE)
        .await
        .unwrap();
    let names = VectorStore::list_collections(&ops).await.unwrap();
    assert!(names.contains(&"project_proj-1".to_owned()));
}

#[tokio::test]
#[ignore = "requires Docker for the Qdrant container"]
async fn create_twice_errors() {
    let (ops, _container) = setup().await;

    VectorStore::create_collection(&ops, "dup", VECTOR_SIZE)
        .await
        .unwrap();
    assert!(
        VectorStore::create_collection(&ops, "dup", VECTOR_SIZE)
            .await
            .is_err()
    );
}

#[tokio::test]
#[ignore = "requires Docker for the Qdrant container"]
async fn upsert_search_and_retrieve_round_trip_payload() {
    let (ops, _container) = setup().await;
    VectorStore::create_collection(&ops, "docs", VECTOR_SIZE)
        .await
        .unwrap();

    let points = vec![
        chunk_point(11, vec![1.0, 0.0, 0.0, 0.0], "alpha beta gamma"),
        chunk_point(12, vec![0.0, 1.0, 0.0, 0.0], "delta"),
    ];
    VectorStore::upsert(&ops, "docs", points).await.unwrap();

    let hits = VectorStore::search(&ops, "docs", vec![1.0, 0.0, 0.0, 0.0], 5)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, 11);
    assert_eq!(hits[0].payload["content"], "alpha beta gamma");
    assert_eq!(hits[0].payload["metadata"]["tags"][1], "b");

    let got = VectorStore::retrieve(&ops, "docs", vec![12]).await.unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].payload["content"], "delta");
}

#[tokio::test]
#[ignore = "requires Docker for the Qdrant container"]
async fn upsert_same_id_overwrites() {
    let (ops, _container) = setup().await;
    VectorStore::create_collection(&ops, "docs", VECTOR_SIZE)
        .await
        .unwrap();

    VectorStore::upsert(&ops, "docs", vec![chunk_point(5, vec![1.0, 0.0, 0.0, 0.0], "old")])
        .await
        .unwrap();
    VectorStore::upsert(&ops, "docs", vec![chunk_point(5, vec![1.0, 0.0, 0.0, 0.0], "new")])
        .await
        .unwrap();

    let hits = VectorStore::search(&ops, "docs", vec![1.0, 0.0, 0.0, 0.0], 10)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].payload["content"], "new");
}
