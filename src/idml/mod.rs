//! IDML export for print layout.
//!
//! [`DocumentBuilder`] turns frozen page layouts into an InDesign Markup
//! Language package: a ZIP archive of XML fragments plus the linked images.
//!
//! # Lifecycle
//!
//! ```text
//! new ──▶ create_document ──▶ add_page / add_frozen_post / add_fitted_image ... ──▶ save
//! ```
//!
//! Calling an operation out of order returns [`PressError::InvalidState`].
//! [`DocumentBuilder::save`] consumes the builder.
//!
//! # Example
//!
//! ```rust,no_run
//! use tgpress::config::PrintSettings;
//! use tgpress::idml::DocumentBuilder;
//! use tgpress::idml::layout::{FrozenPost, RectMm};
//! use tgpress::repository::InMemoryRepository;
//! use tgpress::{Channel, Post};
//!
//! # fn main() -> tgpress::Result<()> {
//! let channel = Channel::new("llamasass", "Llamas");
//! let repo = InMemoryRepository::new()
//!     .with_channel(channel.clone())
//!     .with_post(Post::new(1, "llamasass", "2025-04-09T22:47:00").with_message("<b>Hi</b>"));
//!
//! let mut builder = DocumentBuilder::new(channel, PrintSettings::default(), &repo)
//!     .with_media_root("downloads");
//! builder.create_document()?;
//! builder.add_frozen_post(&FrozenPost::new(1, "llamasass", RectMm::new(0.0, 20.0, 170.0, 30.0)), 1)?;
//! builder.save("llamasass.idml")?;
//! # Ok(())
//! # }
//! ```

pub mod author;
pub mod geometry;
pub mod layout;
pub mod media;
pub mod model;
pub mod package;
pub mod xml;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::{ExportOptions, LayoutConfig, PrintSettings, Units};
use crate::core::filter::should_hide_media;
use crate::dates::format_post_date;
use crate::error::{PressError, Result};
use crate::markup::{Paragraph, parse_markup};
use crate::post::{Channel, Post};
use crate::repository::PostRepository;

use self::author::is_third_party_author;
use self::geometry::{Bounds, Margins, PageSide, frame_transform, page_transform, spread_transform};
use self::layout::{FrozenLayout, FrozenPost, MediaKind, RectMm};
use self::model::{Frame, ImageFrame, Link, Page, Spread, Story, StoryRange, TextFrame, styles};
use self::package::{Scratch, is_contained_path};

/// Side of the circular author picture.
pub const AVATAR_SIZE_PT: f64 = 32.0;

/// Space between the author header and the comment body.
pub const HEADER_GAP_PT: f64 = 4.0;

/// Ids are `<prefix>u<n>` with `n` counting up from here.
const ID_COUNTER_START: u64 = 100;

/// Where a [`DocumentBuilder`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Empty,
    DocumentCreated,
    AddingPages,
    AddingFrozenContent,
}

impl BuilderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuilderState::Empty => "empty",
            BuilderState::DocumentCreated => "created",
            BuilderState::AddingPages => "adding pages",
            BuilderState::AddingFrozenContent => "adding frozen content",
        }
    }
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image to copy into the package.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub source: PathBuf,
    /// Entry name inside the package, under `Links/`
    pub dest: String,
}

/// Mutable state of one export.
#[derive(Debug)]
struct BuilderSession {
    next_id: u64,
    page_width: f64,
    page_height: f64,
    margins: Margins,
    pages: usize,
    spreads: Vec<Spread>,
    stories: Vec<Story>,
    links: Vec<Link>,
    media_files: Vec<MediaFile>,
}

impl BuilderSession {
    fn new(page_width: f64, page_height: f64, margins: Margins) -> Self {
        Self {
            next_id: ID_COUNTER_START,
            page_width,
            page_height,
            margins,
            pages: 0,
            spreads: Vec::new(),
            stories: Vec::new(),
            links: Vec::new(),
            media_files: Vec::new(),
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}u{}", self.next_id)
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn page_mut(&mut self, number: usize) -> Option<&mut Page> {
        // spread k > 0 holds pages 2k and 2k + 1
        let slot = if number == 1 { 0 } else { number % 2 };
        self.spreads
            .get_mut(number / 2)?
            .pages
            .get_mut(slot)
            .filter(|p| p.number == number)
    }

    fn add_page(&mut self) -> usize {
        self.pages += 1;
        let number = self.pages;
        let side = PageSide::of(number);
        let page = Page {
            id: self.next_id("page_"),
            number,
            bounds: Bounds::new(0.0, 0.0, self.page_height, self.page_width),
            transform: page_transform(side, self.page_width, self.page_height),
            frames: Vec::new(),
        };

        // odd pages after the first fill the right side of the open spread
        let opens_spread = number == 1 || side == PageSide::Left;
        if !opens_spread {
            if let Some(spread) = self.spreads.last_mut() {
                spread.pages.push(page);
                return number;
            }
        }

        let spread = Spread {
            id: self.next_id("spread_"),
            binding_location: u8::from(number > 1),
            transform: spread_transform(self.spreads.len(), self.page_height),
            pages: vec![page],
        };
        self.spreads.push(spread);
        number
    }

    fn ensure_pages(&mut self, page_number: usize) {
        while self.page_count() < page_number {
            self.add_page();
        }
    }

    fn add_story(&mut self, ranges: Vec<StoryRange>) -> String {
        let id = self.next_id("story_");
        self.stories.push(Story {
            id: id.clone(),
            ranges,
        });
        id
    }

    fn place(&mut self, page_number: usize, frame: Frame) -> Result<()> {
        let page = self.page_mut(page_number).ok_or_else(|| {
            PressError::invalid_layout(format!("page {page_number} does not exist"), None)
        })?;
        page.frames.push(frame);
        Ok(())
    }

    fn add_text_frame(
        &mut self,
        page_number: usize,
        story_id: String,
        bounds: Bounds,
    ) -> Result<String> {
        let id = self.next_id("frame_");
        let transform = frame_transform(&bounds, page_number, self.page_width, self.page_height);
        self.place(
            page_number,
            Frame::Text(TextFrame {
                id: id.clone(),
                story_id,
                bounds,
                transform,
            }),
        )?;
        Ok(id)
    }

    /// Places the frame, then registers the link and the file copy.
    ///
    /// `relative_path` must stay below the media root; see [`is_contained_path`].
    fn add_image_frame(
        &mut self,
        page_number: usize,
        source: &Path,
        relative_path: &str,
        bounds: Bounds,
        stroke_weight: Option<f64>,
        avatar: bool,
    ) -> Result<String> {
        if !is_contained_path(relative_path) {
            return Err(PressError::invalid_layout(
                format!("image path {relative_path:?} leaves the media root"),
                Some(source.to_path_buf()),
            ));
        }
        let id = self.next_id("frame_");
        let image_id = self.next_id("image_");
        let link_id = self.next_id("link_");
        let link_path = format!("Links/{}", relative_path.replace('\\', "/"));

        let frame = ImageFrame {
            id: id.clone(),
            image_id,
            link_id: link_id.clone(),
            link_path: link_path.clone(),
            transform: frame_transform(&bounds, page_number, self.page_width, self.page_height),
            bounds,
            stroke_weight,
        };
        self.place(
            page_number,
            if avatar {
                Frame::Avatar(frame)
            } else {
                Frame::Image(frame)
            },
        )?;

        self.links.push(Link {
            id: link_id,
            path: link_path.clone(),
        });
        if !self.media_files.iter().any(|m| m.dest == link_path) {
            self.media_files.push(MediaFile {
                source: source.to_path_buf(),
                dest: link_path,
            });
        }
        Ok(id)
    }
}

/// Builds an IDML package for one channel.
pub struct DocumentBuilder<'a, R: PostRepository + ?Sized> {
    channel: Channel,
    settings: PrintSettings,
    repo: &'a R,
    media_root: PathBuf,
    config: LayoutConfig,
    state: BuilderState,
    session: Option<BuilderSession>,
}

impl<'a, R: PostRepository + ?Sized> DocumentBuilder<'a, R> {
    /// Creates a builder. Nothing is laid out until [`create_document`](Self::create_document).
    pub fn new(channel: Channel, settings: PrintSettings, repo: &'a R) -> Self {
        Self {
            channel,
            settings,
            repo,
            media_root: PathBuf::new(),
            config: LayoutConfig::default(),
            state: BuilderState::Empty,
            session: None,
        }
    }

    /// Sets the directory that media and avatar paths are relative to.
    #[must_use]
    pub fn with_media_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.media_root = root.into();
        self
    }

    /// Sets the page-size table and units.
    #[must_use]
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    fn units(&self) -> Units {
        self.config.units
    }

    fn check_page_number(page_number: usize) -> Result<()> {
        if page_number == 0 {
            return Err(PressError::invalid_layout("page_number must be >= 1", None));
        }
        Ok(())
    }

    fn session_mut(&mut self, operation: &'static str) -> Result<&mut BuilderSession> {
        let state = self.state;
        self.session
            .as_mut()
            .ok_or_else(|| PressError::invalid_state(operation, state.as_str()))
    }

    /// Resolves the page size and margins. Creates no pages.
    pub fn create_document(&mut self) -> Result<()> {
        if self.state != BuilderState::Empty {
            return Err(PressError::invalid_state(
                "create a document",
                self.state.as_str(),
            ));
        }

        let units = self.units();
        let size = self.config.page_size(&self.settings.page_size)?;
        let margins = Margins::from_array(self.settings.margins_mm.map(|mm| units.mm_to_pt(mm)));
        let width = units.mm_to_pt(size.width_mm);
        let height = units.mm_to_pt(size.height_mm);

        tracing::debug!(
            channel = %self.channel.id,
            page_size = %self.settings.page_size,
            width,
            height,
            "document created"
        );
        self.session = Some(BuilderSession::new(width, height, margins));
        self.state = BuilderState::DocumentCreated;
        Ok(())
    }

    /// Appends a page and returns its 1-based number.
    ///
    /// Page placement follows the facing-pages model; `is_right_page` is only
    /// checked against it.
    pub fn add_page(&mut self, is_right_page: Option<bool>) -> Result<usize> {
        let session = self.session_mut("add a page")?;
        let number = session.add_page();

        let right = PageSide::of(number) == PageSide::Right;
        if let Some(hint) = is_right_page.filter(|hint| *hint != right) {
            tracing::debug!(page = number, requested_right = hint, "page side hint ignored");
        }

        self.state = BuilderState::AddingPages;
        Ok(number)
    }

    /// Adds pages until `page_number` exists.
    fn ensure_page(&mut self, page_number: usize) -> Result<()> {
        let session = self.session_mut("add a page")?;
        Self::check_page_number(page_number)?;
        session.ensure_pages(page_number);
        self.state = BuilderState::AddingPages;
        Ok(())
    }

    /// Converts frozen millimetre bounds to points on the page.
    ///
    /// `top` is relative to the top margin; `left` already includes the left margin.
    fn frozen_bounds(&self, rect: &RectMm, margins: &Margins) -> Bounds {
        let units = self.units();
        Bounds::from_size(
            units.mm_to_pt(rect.top) + margins.top,
            units.mm_to_pt(rect.left),
            units.mm_to_pt(rect.width),
            units.mm_to_pt(rect.height),
        )
    }

    /// Places one post of a frozen layout on `page_number`, adding pages as needed.
    pub fn add_frozen_post(&mut self, frozen: &FrozenPost, page_number: usize) -> Result<()> {
        let session = self.session_mut("add a frozen post")?;
        Self::check_page_number(page_number)?;
        session.ensure_pages(page_number);
        let margins = session.margins;
        self.state = BuilderState::AddingFrozenContent;

        let Some(post) = self.repo.find_post(&frozen.channel_id, frozen.telegram_id) else {
            tracing::debug!(
                channel = %frozen.channel_id,
                telegram_id = frozen.telegram_id,
                "frozen post not found, skipped"
            );
            return Ok(());
        };

        let mut body_bounds = self.frozen_bounds(&frozen.bounds, &margins);

        if post.is_comment() && is_third_party_author(&post, &self.channel) {
            let header = self.add_author_header(&post, page_number, &body_bounds)?;
            body_bounds = body_bounds.shrink_top(header);
        }

        self.add_body(&post, frozen.date.as_deref(), page_number, body_bounds)?;

        for element in &frozen.media {
            if !element.has_valid_bounds() {
                tracing::warn!(
                    telegram_id = frozen.telegram_id,
                    bounds = ?element.bounds,
                    "media element with invalid bounds skipped"
                );
                continue;
            }
            if element.kind != MediaKind::Image {
                continue;
            }

            let media_id = element.telegram_id.unwrap_or(frozen.telegram_id);
            let media_post = if media_id == post.telegram_id {
                Some(post.clone())
            } else {
                self.repo.find_post(&frozen.channel_id, media_id)
            };
            let Some(media_post) = media_post else {
                tracing::debug!(telegram_id = media_id, "media post not found, skipped");
                continue;
            };
            let Some(media_url) = media_post.media_url.as_deref().filter(|u| !u.is_empty()) else {
                tracing::debug!(telegram_id = media_id, "media post has no file, skipped");
                continue;
            };
            if should_hide_media(&media_post) {
                continue;
            }
            if !is_contained_path(media_url) {
                tracing::warn!(
                    telegram_id = media_id,
                    path = media_url,
                    "media path leaves the media root, skipped"
                );
                continue;
            }

            let source = self.media_root.join(media_url);
            if !source.is_file() {
                tracing::warn!(path = %source.display(), "media file missing, skipped");
                continue;
            }

            let bounds = self.frozen_bounds(&element.bounds, &margins);
            let stroke = element
                .border_width
                .filter(|px| *px > 0.0)
                .map(|px| px * self.units().pt_per_px());
            self.session_mut("add a frozen post")?
                .add_image_frame(page_number, &source, media_url, bounds, stroke, false)?;
        }

        Ok(())
    }

    /// Renders avatar and author name; returns the vertical space taken.
    fn add_author_header(&mut self, post: &Post, page_number: usize, bounds: &Bounds) -> Result<f64> {
        let avatar_bounds = Bounds::from_size(bounds.top, bounds.left, AVATAR_SIZE_PT, AVATAR_SIZE_PT);
        let avatar = post
            .author_avatar
            .as_deref()
            .filter(|a| !a.is_empty())
            .filter(|rel| {
                let contained = is_contained_path(rel);
                if !contained {
                    tracing::warn!(
                        telegram_id = post.telegram_id,
                        path = *rel,
                        "avatar path leaves the media root, skipped"
                    );
                }
                contained
            })
            .map(|rel| (self.media_root.join(rel), rel.to_string()));
        let name = post
            .author_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);

        let session = self.session_mut("add a frozen post")?;
        let mut placed = false;

        if let Some((source, rel)) = avatar {
            if source.is_file() {
                session.add_image_frame(page_number, &source, &rel, avatar_bounds, None, true)?;
                placed = true;
            } else {
                tracing::warn!(path = %source.display(), "avatar file missing, skipped");
            }
        }

        if let Some(name) = name {
            let story_id = session.add_story(vec![StoryRange::new(
                styles::AUTHOR_NAME,
                vec![Paragraph::plain(name)],
            )]);
            let left = bounds.left + AVATAR_SIZE_PT + HEADER_GAP_PT;
            let name_bounds = Bounds::new(
                bounds.top,
                left.min(bounds.right),
                bounds.top + AVATAR_SIZE_PT,
                bounds.right,
            );
            session.add_text_frame(page_number, story_id, name_bounds)?;
            placed = true;
        }

        Ok(if placed {
            AVATAR_SIZE_PT + HEADER_GAP_PT
        } else {
            0.0
        })
    }

    fn add_body(
        &mut self,
        post: &Post,
        date_override: Option<&str>,
        page_number: usize,
        bounds: Bounds,
    ) -> Result<()> {
        let mut ranges = Vec::new();

        if self.settings.show_post_dates {
            let raw = date_override.unwrap_or(&post.date);
            if let Some(date) = format_post_date(raw) {
                ranges.push(StoryRange::new(styles::POST_DATE, vec![Paragraph::plain(date)]));
            }
        }

        let body = post.message.as_deref().map(parse_markup).unwrap_or_default();
        if !body.is_empty() {
            ranges.push(StoryRange::new(styles::POST_BODY, body));
        }

        if ranges.is_empty() {
            return Ok(());
        }

        let session = self.session_mut("add a frozen post")?;
        let story_id = session.add_story(ranges);
        session.add_text_frame(page_number, story_id, bounds)?;
        Ok(())
    }

    /// Places an image proportionally inside the text area of `page_number`.
    ///
    /// The image takes the full column width, starting at `top_pt`, and is
    /// scaled down to `max_height_pt` if needed. Returns the frame id, or
    /// `None` when the image size can't be read.
    pub fn add_fitted_image(
        &mut self,
        page_number: usize,
        image_path: impl AsRef<Path>,
        top_pt: f64,
        max_height_pt: Option<f64>,
    ) -> Result<Option<String>> {
        let image_path = image_path.as_ref();
        let session = self.session_mut("add an image")?;
        Self::check_page_number(page_number)?;
        session.ensure_pages(page_number);

        let Some(dimensions) = media::image_dimensions(image_path) else {
            return Ok(None);
        };

        let area = session
            .margins
            .content_box(session.page_width, session.page_height);
        let bounds = media::fit_image_bounds(dimensions, &area, top_pt, max_height_pt);
        let name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = session.add_image_frame(page_number, image_path, &name, bounds, None, false)?;

        self.state = BuilderState::AddingFrozenContent;
        Ok(Some(id))
    }

    pub fn page_count(&self) -> usize {
        self.session.as_ref().map_or(0, BuilderSession::page_count)
    }

    pub fn spreads(&self) -> &[Spread] {
        self.session.as_ref().map(|s| s.spreads.as_slice()).unwrap_or_default()
    }

    pub fn stories(&self) -> &[Story] {
        self.session.as_ref().map(|s| s.stories.as_slice()).unwrap_or_default()
    }

    pub fn links(&self) -> &[Link] {
        self.session.as_ref().map(|s| s.links.as_slice()).unwrap_or_default()
    }

    pub fn media_files(&self) -> &[MediaFile] {
        self.session.as_ref().map(|s| s.media_files.as_slice()).unwrap_or_default()
    }

    /// Writes the package to `output` and returns its path.
    ///
    /// The scratch directory is removed whether or not packaging succeeds.
    pub fn save(self, output: impl AsRef<Path>) -> Result<PathBuf> {
        let output = output.as_ref();
        let Some(session) = self.session else {
            return Err(PressError::invalid_state("save", self.state.as_str()));
        };

        let document_name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.idml", self.channel.id));

        let mut scratch = Scratch::new()?;
        scratch.write("META-INF/container.xml", xml::container_xml())?;
        scratch.write("META-INF/metadata.xml", xml::metadata_xml(Utc::now()))?;
        scratch.write(
            "designmap.xml",
            xml::designmap_xml(&document_name, &session.spreads, &session.stories),
        )?;
        scratch.write("Resources/Graphic.xml", xml::graphic_xml())?;
        scratch.write("Resources/Fonts.xml", xml::fonts_xml())?;
        scratch.write("Resources/Styles.xml", xml::styles_xml())?;
        scratch.write(
            "Resources/Preferences.xml",
            xml::preferences_xml(session.page_width, session.page_height, &session.margins),
        )?;
        scratch.write("XML/BackingStory.xml", xml::backing_story_xml())?;
        scratch.write("XML/Tags.xml", xml::tags_xml())?;

        for spread in &session.spreads {
            scratch.write(
                &xml::spread_entry_name(&spread.id),
                xml::spread_xml(spread, session.page_width, &session.margins),
            )?;
        }
        for story in &session.stories {
            scratch.write(&xml::story_entry_name(&story.id), xml::story_xml(story))?;
        }
        for media in &session.media_files {
            scratch.copy(&media.dest, &media.source)?;
        }

        scratch.zip_into(output)?;

        tracing::info!(
            output = %output.display(),
            pages = session.page_count(),
            stories = session.stories.len(),
            images = session.media_files.len(),
            "IDML package written"
        );
        Ok(output.to_path_buf())
    }
}

/// Exports a whole frozen layout of `channel_id` to `output`.
///
/// Pages are visited in `page_number` order; the channel's print settings
/// override the defaults.
pub fn export_frozen_layout<R: PostRepository + ?Sized>(
    repo: &R,
    channel_id: &str,
    layout: &FrozenLayout,
    options: &ExportOptions,
    output: impl AsRef<Path>,
) -> Result<PathBuf> {
    let channel = repo
        .find_channel(channel_id)
        .ok_or_else(|| PressError::channel_not_found(channel_id))?;
    let settings = channel.effective_print_settings();

    let mut builder = DocumentBuilder::new(channel, settings, repo)
        .with_media_root(&options.media_root)
        .with_config(options.layout.clone());
    builder.create_document()?;

    for page in layout.sorted_pages() {
        builder.ensure_page(page.page_number)?;
        for post in &page.posts {
            builder.add_frozen_post(post, page.page_number)?;
        }
    }

    tracing::info!(
        channel = channel_id,
        pages = builder.page_count(),
        posts = layout.post_count(),
        "frozen layout exported"
    );
    builder.save(output)
}
