use ffwrap_core::operations::Pad;

fn main() {
    ffwrap_cli::run::<Pad>()
}
