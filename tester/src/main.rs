use std::time::Duration;

use wallet::{
    gateway::{MOCK_PIN, MockGateway, PaymentGateway, PaymentRequest, Provider},
    ledger::Ledger,
    order::{self, OrderDraft},
    storage::MemoryStorage,
    unlock::UnlockFlow,
};

// Drives the full happy path in memory: pay, unlock, order.
#[tokio::main]
async fn main() {
    let store = MemoryStorage::new();
    let gateway = MockGateway::new(Duration::from_millis(50));

    let mut ledger = Ledger::load(store).await.unwrap();
    println!("Loaded wallet: {:?}", ledger.snapshot());

    let receipt = gateway
        .pay(&PaymentRequest {
            provider: Provider::Mtn,
            phone: "0788000000".to_string(),
            amount: 45_000,
        })
        .await
        .unwrap();
    println!("{} ({})", receipt.message, receipt.card_id);

    ledger.credit(receipt.credited).await.unwrap();

    let mut flow = UnlockFlow::new();
    flow.begin(receipt.card_id).unwrap();

    flow.submit_pin("0000", &gateway).await.unwrap_err();
    flow.submit_pin(MOCK_PIN, &gateway).await.unwrap();
    ledger.activate().await.unwrap();
    println!("Card unlocked: {:?}", flow.state());

    let mut draft = OrderDraft::new("UR - Huye Campus Canteen".to_string(), 1_500);
    draft.increment();
    draft.increment();

    let confirmation = order::place(&draft, &mut ledger).await.unwrap();
    println!("{}", confirmation.message);
    println!("New balance: {} RWF", confirmation.new_balance);
}
