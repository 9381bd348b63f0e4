//! Rotating greetings demo.
//!
//! A data source rotates a three-element greeting list once a second and
//! invalidates `"Query.greetings"`; a live query registered against the
//! store receives the fresh list after every rotation.
//!
//! Run with: `cargo run --example greetings`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use livestore_core::{
    Execution, ExecutionResult, ExecutorError, LiveQueryStore, Operation, QueryExecutor, Tag,
};
use parking_lot::Mutex;
use serde_json::json;

/// Stand-in for a real query engine: resolves `greetings` from shared state
/// and reports the tag it read.
struct GreetingsExecutor {
    greetings: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl QueryExecutor for GreetingsExecutor {
    type Context = ();

    async fn execute(
        &self,
        _operation: &Operation,
        _context: &Self::Context,
    ) -> Result<Execution, ExecutorError> {
        let greetings = self.greetings.lock().clone();
        Ok(Execution::new(
            ExecutionResult::data(json!({ "greetings": greetings })),
            [Tag::new("Query.greetings")],
        ))
    }
}

#[tokio::main]
async fn main() {
    let greetings = Arc::new(Mutex::new(vec![
        "hi".to_string(),
        "sup".to_string(),
        "hallo".to_string(),
    ]));

    let store = LiveQueryStore::new(Arc::new(GreetingsExecutor {
        greetings: Arc::clone(&greetings),
    }));

    // The mutation path: rotate the list and tell the store what changed.
    {
        let greetings = Arc::clone(&greetings);
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // first tick fires immediately
            loop {
                interval.tick().await;
                {
                    let mut list = greetings.lock();
                    let head = list.remove(0);
                    list.push(head);
                }
                store.invalidate(&Tag::new("Query.greetings"));
            }
        });
    }

    let (id, mut results) = store
        .register(Operation::new("query @live { greetings }"), ())
        .await
        .expect("executor available");

    println!("registered live query {}", id);

    for _ in 0..5 {
        match results.recv().await {
            Some(result) => println!("-> {}", serde_json::to_string(&result).unwrap()),
            None => break,
        }
    }

    store.unregister(&id);
    store.shutdown();
}
