use indicatif::{ProgressBar, ProgressStyle};
use lobby_lda::Progress;

/// Page progress while a search is fetching.
pub fn page_bar(page_cap: u32) -> ProgressBar {
    let pb = ProgressBar::new(page_cap as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [ {bar:50} ] {pos}/{len} pages {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#|-"),
    );
    pb
}

pub fn advance(pb: &ProgressBar, progress: &Progress) {
    pb.set_length(progress.page_cap as u64);
    pb.set_position(progress.pages as u64);
    pb.set_message(format!("fetched {} records ...", progress.records));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_tracks_pages() {
        let pb = page_bar(5);
        advance(
            &pb,
            &Progress {
                records: 50,
                pages: 2,
                page_cap: 5,
            },
        );
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.length(), Some(5));
        assert_eq!(pb.message(), "fetched 50 records ...");
    }
}
