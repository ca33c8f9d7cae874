use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backs `hookcast --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate hookcast build metadata");
}
