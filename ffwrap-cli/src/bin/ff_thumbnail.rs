use ffwrap_core::operations::Thumbnail;

fn main() {
    ffwrap_cli::run::<Thumbnail>()
}
