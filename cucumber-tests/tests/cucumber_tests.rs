use cucumber::World;
use cucumber_tests::features::MedgateWorld;

#[tokio::main]
async fn main() {
    MedgateWorld::cucumber().fail_on_skipped().run_and_exit("features/").await;
}
