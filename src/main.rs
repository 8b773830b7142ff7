use hologram_shader::{config::RendererConfig, flow};

fn main() -> anyhow::Result<()> {
    flow::run(RendererConfig::default())
}
