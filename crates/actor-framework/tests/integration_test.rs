use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceActor, ResourceClient};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Tab {
    id: u32,
    table: String,
    covers: u32,
    total: u64,
}

#[derive(Debug)]
struct OpenTab {
    table: String,
    covers: u32,
}

#[derive(Debug)]
struct MoveTab {
    table: Option<String>,
}

#[derive(Debug)]
enum TabAction {
    Charge(u64),
    Refund(u64),
}

#[derive(Debug, thiserror::Error)]
enum TabError {
    #[error("A tab needs at least one cover")]
    NoCovers,
    #[error("Refund of {0} exceeds the tab total")]
    RefundTooLarge(u64),
}

#[async_trait]
impl ActorEntity for Tab {
    type Id = u32;
    type Create = OpenTab;
    type Update = MoveTab;
    type Action = TabAction;
    type ActionResult = u64;
    type Context = ();
    type Error = TabError;

    fn from_create_params(id: u32, params: OpenTab) -> Result<Self, Self::Error> {
        if params.covers == 0 {
            return Err(TabError::NoCovers);
        }
        Ok(Self {
            id,
            table: params.table,
            covers: params.covers,
            total: 0,
        })
    }

    async fn on_update(&mut self, update: MoveTab, _ctx: &Self::Context) -> Result<(), Self::Error> {
        if let Some(table) = update.table {
            self.table = table;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: TabAction,
        _ctx: &Self::Context,
    ) -> Result<u64, Self::Error> {
        match action {
            TabAction::Charge(amount) => self.total += amount,
            TabAction::Refund(amount) => {
                self.total = self
                    .total
                    .checked_sub(amount)
                    .ok_or(TabError::RefundTooLarge(amount))?;
            }
        }
        Ok(self.total)
    }
}

struct TabClient {
    inner: ResourceClient<Tab>,
}

#[async_trait]
impl ActorClient<Tab> for TabClient {
    type Error = String;

    fn inner(&self) -> &ResourceClient<Tab> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> String {
        e.to_string()
    }
}

fn open(table: &str, covers: u32) -> OpenTab {
    OpenTab {
        table: table.to_string(),
        covers,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::new(10);
    actor.spawn(());

    let id: u32 = client.create(open("T1", 2)).await.unwrap();
    assert_eq!(id, 1);

    let total = client.perform_action(id, TabAction::Charge(1200)).await.unwrap();
    assert_eq!(total, 1200);

    let tab: Tab = client.get(id).await.unwrap().unwrap();
    assert_eq!(tab.covers, 2);
    assert_eq!(tab.total, 1200);

    let moved = client
        .update(
            id,
            MoveTab {
                table: Some("T7".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.table, "T7");
    assert_eq!(moved.total, 1200);

    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_ids_are_sequential_and_not_reused() {
    let (actor, client) = ResourceActor::<Tab>::new(10);
    actor.spawn(());

    let first = client.create(open("T1", 1)).await.unwrap();
    client.delete(first).await.unwrap();
    let second = client.create(open("T2", 1)).await.unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[tokio::test]
async fn test_entity_errors_are_boxed() {
    let (actor, client) = ResourceActor::<Tab>::new(10);
    actor.spawn(());

    let result = client.create(open("T1", 0)).await;
    assert!(matches!(result, Err(FrameworkError::EntityError(_))));

    let id = client.create(open("T1", 1)).await.unwrap();
    let err = client
        .perform_action(id, TabAction::Refund(5))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Entity error: Refund of 5 exceeds the tab total");
    assert!(!err.is_transport());

    // A failed action leaves the entity untouched.
    assert_eq!(client.get(id).await.unwrap().unwrap().total, 0);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (actor, client) = ResourceActor::<Tab>::new(10);
    actor.spawn(());

    let action = client.perform_action(42, TabAction::Charge(1)).await;
    assert!(matches!(action, Err(FrameworkError::NotFound(ref id)) if id == "42"));

    let delete = client.delete(42).await;
    assert!(matches!(delete, Err(FrameworkError::NotFound(_))));

    assert!(client.get(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_actions_are_serialized() {
    let (actor, client) = ResourceActor::<Tab>::new(4);
    actor.spawn(());
    let id = client.create(open("T1", 4)).await.unwrap();

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.perform_action(id, TabAction::Charge(2)).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(client.get(id).await.unwrap().unwrap().total, 100);
}

#[tokio::test]
async fn test_closed_actor_reports_transport_error() {
    let (actor, client) = ResourceActor::<Tab>::new(1);
    drop(actor);

    assert!(client.is_closed());
    let err = client.create(open("T1", 1)).await.unwrap_err();
    assert!(matches!(err, FrameworkError::ActorClosed));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_actor_client_defaults() {
    let (actor, inner) = ResourceActor::<Tab>::new(10);
    actor.spawn(());
    let id = inner.create(open("T3", 2)).await.unwrap();

    let tabs = TabClient { inner };
    assert!(tabs.exists(id).await.unwrap());
    tabs.delete(id).await.unwrap();
    assert!(!tabs.exists(id).await.unwrap());

    let err = tabs.delete(id).await.unwrap_err();
    assert_eq!(err, "Item not found: 1");
}
