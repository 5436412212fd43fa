// Copyright (c) 2026 rezky_nightky

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use image::{imageops::FilterType, GenericImageView};

#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{} has no pixels", .0.display())]
    EmptyImage(PathBuf),
}

/// Mask options taken from the command line.
#[derive(Clone, Debug)]
pub struct MaskSettings {
    pub path: PathBuf,
    pub invert: bool,
    pub offset_row: i32,
    pub offset_col: i32,
    pub font_ratio: u16,
}

/// What a renderer is asked to draw: an image fitted into a terminal area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskRequest {
    pub path: PathBuf,
    pub cols: u16,
    pub rows: u16,
    pub font_ratio: u16,
}

/// Turns an image into lines of text art. Runs off the render thread.
pub trait MaskRenderer: Send + Sync {
    fn render(&self, req: &MaskRequest) -> Result<Vec<String>, MaskError>;
}

/// Grid of opaque and blank cells aligned to the terminal by an offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskOverlay {
    grid: Vec<Vec<char>>,
    offset_row: i32,
    offset_col: i32,
    invert: bool,
}

impl MaskOverlay {
    pub fn from_lines<S: AsRef<str>>(
        lines: &[S],
        offset_row: i32,
        offset_col: i32,
        invert: bool,
    ) -> Self {
        let grid = lines
            .iter()
            .map(|l| strip_ansi(l.as_ref()).chars().collect())
            .collect();
        Self {
            grid,
            offset_row,
            offset_col,
            invert,
        }
    }

    pub fn blank_sentinel(&self) -> char {
        if self.invert {
            '#'
        } else {
            ' '
        }
    }

    /// True when a write at terminal `(row, col)` must be drawn blank.
    pub fn suppresses(&self, row: i32, col: i32) -> bool {
        let r = row - self.offset_row;
        let c = col - self.offset_col;
        if r < 0 || c < 0 {
            return false;
        }
        self.grid
            .get(r as usize)
            .and_then(|line| line.get(c as usize))
            .is_some_and(|&cell| cell == self.blank_sentinel())
    }
}

/// Removes CSI color/style sequences from renderer output.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for n in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&n) {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Size of the text-art image in cells, keeping the picture's proportions
/// given cells `font_ratio` times taller than wide.
pub fn fit_dimensions(
    img_width: u32,
    img_height: u32,
    max_cols: u16,
    max_rows: u16,
    font_ratio: u16,
) -> (u16, u16) {
    if img_width == 0 || img_height == 0 || max_cols == 0 || max_rows == 0 {
        return (0, 0);
    }
    let aspect = img_width as f32 / img_height as f32;
    let ratio = font_ratio.max(1) as f32;

    let mut cols = max_cols as f32;
    let mut rows = cols / (aspect * ratio);
    if rows > max_rows as f32 {
        rows = max_rows as f32;
        cols = rows * aspect * ratio;
    }

    let cols = (cols.round() as u16).clamp(1, max_cols);
    let rows = (rows.round() as u16).clamp(1, max_rows);
    (cols, rows)
}

/// Thresholds an image file into `#` (lit) and ` ` (dark) cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageMaskRenderer;

impl MaskRenderer for ImageMaskRenderer {
    fn render(&self, req: &MaskRequest) -> Result<Vec<String>, MaskError> {
        let img = image::open(&req.path).map_err(|source| MaskError::Open {
            path: req.path.clone(),
            source,
        })?;
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(MaskError::EmptyImage(req.path.clone()));
        }

        let (cols, rows) = fit_dimensions(w, h, req.cols, req.rows, req.font_ratio);
        if cols == 0 || rows == 0 {
            return Ok(Vec::new());
        }
        let small = img
            .resize_exact(cols as u32, rows as u32, FilterType::Triangle)
            .to_luma_alpha8();

        let lines = (0..rows as u32)
            .map(|y| {
                (0..cols as u32)
                    .map(|x| {
                        let px = small.get_pixel(x, y);
                        if px[0] >= 128 && px[1] >= 128 {
                            '#'
                        } else {
                            ' '
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(lines)
    }
}

type MaskResult = (u64, Result<Vec<String>, MaskError>);

/// Background mask computation. Each resize submits a job tagged with a
/// generation; the render loop polls without blocking and only installs
/// results newer than the one it already has.
pub struct MaskTask {
    renderer: Arc<dyn MaskRenderer>,
    settings: MaskSettings,
    tx: Sender<MaskResult>,
    rx: Receiver<MaskResult>,
    next_gen: u64,
    installed_gen: u64,
}

impl MaskTask {
    pub fn new(renderer: Arc<dyn MaskRenderer>, settings: MaskSettings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            renderer,
            settings,
            tx,
            rx,
            next_gen: 0,
            installed_gen: 0,
        }
    }

    pub fn submit(&mut self, cols: u16, rows: u16) {
        self.next_gen += 1;
        let generation = self.next_gen;
        let req = MaskRequest {
            path: self.settings.path.clone(),
            cols,
            rows,
            font_ratio: self.settings.font_ratio,
        };
        let renderer = Arc::clone(&self.renderer);
        let tx = self.tx.clone();
        tracing::debug!(generation, cols, rows, "mask job submitted");
        thread::spawn(move || {
            let res = renderer.render(&req);
            // The receiver only disappears when the engine is gone.
            let _ = tx.send((generation, res));
        });
    }

    /// Newest finished grid, if any arrived since the last call.
    pub fn poll(&mut self) -> Result<Option<MaskOverlay>, MaskError> {
        let mut newest: Option<(u64, Vec<String>)> = None;
        loop {
            match self.rx.try_recv() {
                Ok((generation, res)) => {
                    let lines = res?;
                    if generation <= self.installed_gen
                        || newest.as_ref().is_some_and(|(g, _)| *g > generation)
                    {
                        tracing::debug!(generation, "stale mask discarded");
                        continue;
                    }
                    newest = Some((generation, lines));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        Ok(newest.map(|(generation, lines)| {
            self.installed_gen = generation;
            tracing::debug!(generation, rows = lines.len(), "mask installed");
            MaskOverlay::from_lines(
                &lines,
                self.settings.offset_row,
                self.settings.offset_col,
                self.settings.invert,
            )
        }))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    /// Renderer returning a fixed block of text, or failing on demand.
    pub(crate) struct StaticRenderer {
        pub lines: Vec<String>,
        pub fail: bool,
    }

    impl MaskRenderer for StaticRenderer {
        fn render(&self, req: &MaskRequest) -> Result<Vec<String>, MaskError> {
            if self.fail {
                return Err(MaskError::EmptyImage(req.path.clone()));
            }
            Ok(self.lines.clone())
        }
    }

    pub(crate) fn settings(invert: bool, offset_row: i32, offset_col: i32) -> MaskSettings {
        MaskSettings {
            path: PathBuf::from("shape.png"),
            invert,
            offset_row,
            offset_col,
            font_ratio: 2,
        }
    }

    pub(crate) fn wait_for_mask(task: &mut MaskTask) -> Result<MaskOverlay, MaskError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(m) = task.poll()? {
                return Ok(m);
            }
            assert!(Instant::now() < deadline, "mask never arrived");
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn all_blank_grid_suppresses_every_cell_inside_it() {
        let mask = MaskOverlay::from_lines(&["   ", "   ", "   "], 2, 4, false);
        for r in 2..5 {
            for c in 4..7 {
                assert!(mask.suppresses(r, c), "({}, {})", r, c);
            }
        }
        assert!(!mask.suppresses(1, 4));
        assert!(!mask.suppresses(2, 3));
        assert!(!mask.suppresses(5, 4));
        assert!(!mask.suppresses(2, 7));
    }

    #[test]
    fn invert_flips_the_blank_sentinel() {
        let lines = ["# ", " #"];
        let plain = MaskOverlay::from_lines(&lines, 0, 0, false);
        let inverted = MaskOverlay::from_lines(&lines, 0, 0, true);
        assert_eq!(plain.blank_sentinel(), ' ');
        assert_eq!(inverted.blank_sentinel(), '#');
        assert!(!plain.suppresses(0, 0));
        assert!(plain.suppresses(0, 1));
        assert!(inverted.suppresses(0, 0));
        assert!(!inverted.suppresses(0, 1));
    }

    #[test]
    fn ragged_rows_only_suppress_existing_cells() {
        let mask = MaskOverlay::from_lines(&["  ", " "], 0, 0, false);
        assert!(mask.suppresses(1, 0));
        assert!(!mask.suppresses(1, 1));
    }

    #[test]
    fn color_codes_are_stripped_from_renderer_output() {
        assert_eq!(strip_ansi("\x1b[32;1m#\x1b[0m #"), "# #");
        assert_eq!(strip_ansi("plain"), "plain");
        let mask = MaskOverlay::from_lines(&["\x1b[31m \x1b[0m#"], 0, 0, false);
        assert!(mask.suppresses(0, 0));
        assert!(!mask.suppresses(0, 1));
    }

    #[test]
    fn fit_keeps_proportions_with_font_ratio() {
        // Square image, cells twice as tall as wide.
        assert_eq!(fit_dimensions(100, 100, 80, 24, 2), (48, 24));
        // Wide image is limited by columns.
        assert_eq!(fit_dimensions(400, 100, 80, 24, 2), (80, 10));
        assert_eq!(fit_dimensions(0, 100, 80, 24, 2), (0, 0));
        assert_eq!(fit_dimensions(100, 100, 80, 0, 2), (0, 0));
    }

    #[test]
    fn image_renderer_thresholds_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half.png");
        let img = image::RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        });
        img.save(&path).unwrap();

        let lines = ImageMaskRenderer
            .render(&MaskRequest {
                path,
                cols: 4,
                rows: 1,
                font_ratio: 1,
            })
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 2);
        // Fitted to 2x1 cells: left half lit, right half dark.
        assert_eq!(lines[0], "# ");
    }

    #[test]
    fn image_renderer_reports_missing_files() {
        let err = ImageMaskRenderer
            .render(&MaskRequest {
                path: PathBuf::from("/definitely/not/here.png"),
                cols: 10,
                rows: 10,
                font_ratio: 2,
            })
            .unwrap_err();
        assert!(matches!(err, MaskError::Open { .. }));
    }

    #[test]
    fn task_delivers_the_rendered_grid() {
        let renderer = Arc::new(StaticRenderer {
            lines: vec![" #".to_string()],
            fail: false,
        });
        let mut task = MaskTask::new(renderer, settings(false, 0, 0));
        assert!(task.poll().unwrap().is_none());
        task.submit(80, 24);
        let mask = wait_for_mask(&mut task).unwrap();
        assert!(mask.suppresses(0, 0));
        assert!(!mask.suppresses(0, 1));
    }

    #[test]
    fn task_surfaces_renderer_failures() {
        let renderer = Arc::new(StaticRenderer {
            lines: Vec::new(),
            fail: true,
        });
        let mut task = MaskTask::new(renderer, settings(false, 0, 0));
        task.submit(80, 24);
        assert!(wait_for_mask(&mut task).is_err());
    }

    #[test]
    fn stale_generations_are_not_installed() {
        let renderer = Arc::new(StaticRenderer {
            lines: vec![" ".to_string()],
            fail: false,
        });
        let mut task = MaskTask::new(renderer, settings(false, 0, 0));
        task.installed_gen = 5;
        task.tx.send((3, Ok(vec!["#".to_string()]))).unwrap();
        assert!(task.poll().unwrap().is_none());

        task.tx.send((7, Ok(vec!["#".to_string()]))).unwrap();
        task.tx.send((6, Ok(vec![" ".to_string()]))).unwrap();
        let mask = task.poll().unwrap().unwrap();
        assert!(!mask.suppresses(0, 0));
        assert_eq!(task.installed_gen, 7);
    }
}
