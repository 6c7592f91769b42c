//! XML fragments of an IDML package.
//!
//! Every function returns a complete document as a string. Element and
//! attribute names follow the IDML schema; InDesign refuses packages that
//! deviate from it.

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use uuid::Uuid;

use super::geometry::{Margins, PathPoint, ellipse_path, fmt_num, rect_path};
use super::model::{Frame, ImageFrame, Spread, Story, StoryRange, TextFrame, styles};
use crate::markup::{Inline, Run};

/// Content of the `mimetype` entry.
pub const IDML_MIMETYPE: &str = "application/vnd.adobe.indesign-idml-package";

pub const DOM_VERSION: &str = "17.0";

/// Id of the backing XML story listed in every `StoryList`.
pub const BACKING_STORY_ID: &str = "ub0";

const NS_PACKAGING: &str = "http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const AID_PI: &str = r#"<?aid style="50" type="document" readerVersion="6.0" featureSet="257" product="17.4(51)" ?>"#;

/// IDML forced line break (U+2028).
const FORCED_LINE_BREAK: char = '\u{2028}';

const CREATOR_TOOL: &str = concat!("tgpress ", env!("CARGO_PKG_VERSION"));

fn open_package_root(name: &str) -> String {
    format!(
        "{XML_DECL}\n<idPkg:{name} xmlns:idPkg=\"{NS_PACKAGING}\" DOMVersion=\"{DOM_VERSION}\">\n"
    )
}

fn close_package_root(name: &str) -> String {
    format!("</idPkg:{name}>\n")
}

// ============================================================================
// Package skeleton
// ============================================================================

pub fn container_xml() -> String {
    format!(
        r#"{XML_DECL}
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="designmap.xml" media-type="text/xml"/>
  </rootfiles>
</container>
"#
    )
}

/// XMP packet with fresh document ids.
pub fn metadata_xml(now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"{XML_DECL}
<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about=""
        xmlns:dc="http://purl.org/dc/elements/1.1/"
        xmlns:xmp="http://ns.adobe.com/xap/1.0/"
        xmlns:xmpMM="http://ns.adobe.com/xap/1.0/mm/">
      <dc:format>application/x-indesign</dc:format>
      <xmp:CreateDate>{stamp}</xmp:CreateDate>
      <xmp:MetadataDate>{stamp}</xmp:MetadataDate>
      <xmp:ModifyDate>{stamp}</xmp:ModifyDate>
      <xmp:CreatorTool>{CREATOR_TOOL}</xmp:CreatorTool>
      <xmpMM:InstanceID>xmp.iid:{instance}</xmpMM:InstanceID>
      <xmpMM:DocumentID>xmp.did:{document}</xmpMM:DocumentID>
      <xmpMM:OriginalDocumentID>xmp.did:{document}</xmpMM:OriginalDocumentID>
      <xmpMM:RenditionClass>default</xmpMM:RenditionClass>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="r"?>
"#,
        instance = Uuid::new_v4(),
        document = Uuid::new_v4(),
    )
}

/// The package manifest.
pub fn designmap_xml(document_name: &str, spreads: &[Spread], stories: &[Story]) -> String {
    let story_list = stories
        .iter()
        .map(|s| s.id.as_str())
        .chain(std::iter::once(BACKING_STORY_ID))
        .collect::<Vec<_>>()
        .join(" ");

    let mut xml = format!("{XML_DECL}\n{AID_PI}\n");
    xml.push_str(&format!(
        r#"<Document xmlns:idPkg="{NS_PACKAGING}" DOMVersion="{DOM_VERSION}" Self="d" StoryList="{story_list}" Name="{name}" ZeroPoint="0 0" ActiveLayer="u1">
  <Language Self="Language/$ID/English%3a USA" Name="$ID/English: USA" SingleQuotes="&apos;&apos;" DoubleQuotes="&quot;&quot;" PrimaryLanguageName="$ID/English" SublanguageName="$ID/USA" Id="269" HyphenationVendor="Hunspell" SpellingVendor="Hunspell"/>
  <idPkg:Graphic src="Resources/Graphic.xml"/>
  <idPkg:Fonts src="Resources/Fonts.xml"/>
  <idPkg:Styles src="Resources/Styles.xml"/>
  <NumberingList Self="NumberingList/$ID/[Default]" Name="$ID/[Default]" ContinueNumbersAcrossStories="false" ContinueNumbersAcrossDocuments="false"/>
  <idPkg:Preferences src="Resources/Preferences.xml"/>
  <idPkg:Tags src="XML/Tags.xml"/>
  <Layer Self="u1" Name="Layer 1" Visible="true" Locked="false" IgnoreWrap="false" ShowGuides="true" LockGuides="false" UI="true" Expendable="true" Printable="true">
    <Properties>
      <LayerColor type="enumeration">LightBlue</LayerColor>
    </Properties>
  </Layer>
"#,
        name = escape(document_name),
    ));

    for spread in spreads {
        xml.push_str(&format!(
            "  <idPkg:Spread src=\"{}\"/>\n",
            spread_entry_name(&spread.id)
        ));
    }
    for story in stories {
        xml.push_str(&format!(
            "  <idPkg:Story src=\"{}\"/>\n",
            story_entry_name(&story.id)
        ));
    }
    xml.push_str("  <idPkg:BackingStory src=\"XML/BackingStory.xml\"/>\n");
    xml.push_str("</Document>\n");
    xml
}

/// Package path of a spread fragment.
pub fn spread_entry_name(id: &str) -> String {
    format!("Spreads/Spread_{id}.xml")
}

/// Package path of a story fragment.
pub fn story_entry_name(id: &str) -> String {
    format!("Stories/Story_{id}.xml")
}

// ============================================================================
// Resources
// ============================================================================

pub fn graphic_xml() -> String {
    let mut xml = open_package_root("Graphic");
    xml.push_str(
        r#"  <Color Self="Color/Black" Model="Process" Space="CMYK" ColorValue="0 0 0 100" ColorOverride="Specialblack" BaseColor="n" Name="Black" ColorEditable="false" ColorRemovable="false" Visible="true" SwatchCreatorID="7937"/>
  <Color Self="Color/Gray" Model="Process" Space="CMYK" ColorValue="0 0 0 60" ColorOverride="Normal" BaseColor="n" Name="Gray" ColorEditable="true" ColorRemovable="true" Visible="true" SwatchCreatorID="7937"/>
  <Swatch Self="Swatch/None" Name="None" ColorEditable="false" ColorRemovable="false" Visible="true" SwatchCreatorID="7937"/>
"#,
    );
    xml.push_str(&close_package_root("Graphic"));
    xml
}

pub fn fonts_xml() -> String {
    let mut xml = open_package_root("Fonts");
    xml.push_str(
        r#"  <FontFamily Self="di2i3" Name="Arial">
    <Font Self="di2i3Font0" FontFamily="Arial" Name="Arial" PostScriptName="ArialMT" Status="Installed" FontStyleName="Regular"/>
    <Font Self="di2i3Font1" FontFamily="Arial" Name="Arial Bold" PostScriptName="Arial-BoldMT" Status="Installed" FontStyleName="Bold"/>
    <Font Self="di2i3Font2" FontFamily="Arial" Name="Arial Italic" PostScriptName="Arial-ItalicMT" Status="Installed" FontStyleName="Italic"/>
    <Font Self="di2i3Font3" FontFamily="Arial" Name="Arial Bold Italic" PostScriptName="Arial-BoldItalicMT" Status="Installed" FontStyleName="Bold Italic"/>
  </FontFamily>
"#,
    );
    xml.push_str(&close_package_root("Fonts"));
    xml
}

fn character_style(name: &str, size: u32, color: &str, font_style: Option<&str>) -> String {
    let font_style = font_style
        .map(|s| format!(" FontStyle=\"{s}\""))
        .unwrap_or_default();
    format!(
        r#"    <CharacterStyle Self="{self_id}" Name="{name}" PointSize="{size}" FillColor="{color}"{font_style}>
      <Properties>
        <AppliedFont type="string">Arial</AppliedFont>
      </Properties>
    </CharacterStyle>
"#,
        self_id = styles::character(name),
    )
}

fn paragraph_style(name: &str, space_after: u32, justification: &str) -> String {
    format!(
        "    <ParagraphStyle Self=\"{}\" Name=\"{name}\" SpaceAfter=\"{space_after}\" Justification=\"{justification}\"/>\n",
        styles::paragraph(name),
    )
}

pub fn styles_xml() -> String {
    let mut xml = open_package_root("Styles");

    xml.push_str("  <RootCharacterStyleGroup Self=\"u79\">\n");
    xml.push_str(&format!(
        "    <CharacterStyle Self=\"{}\" Name=\"$ID/[No character style]\"/>\n",
        styles::NO_CHARACTER_STYLE
    ));
    xml.push_str(&character_style(styles::POST_DATE, 10, "Color/Gray", None));
    xml.push_str(&character_style(styles::POST_BODY, 12, "Color/Black", None));
    xml.push_str(&character_style(styles::AUTHOR_NAME, 10, "Color/Black", Some("Bold")));
    xml.push_str("  </RootCharacterStyleGroup>\n");

    xml.push_str("  <RootParagraphStyleGroup Self=\"u78\">\n");
    xml.push_str(&format!(
        "    <ParagraphStyle Self=\"{}\" Name=\"$ID/[No paragraph style]\"/>\n",
        styles::NO_PARAGRAPH_STYLE
    ));
    xml.push_str(&paragraph_style(styles::POST_DATE, 4, "RightAlign"));
    xml.push_str(&paragraph_style(styles::POST_BODY, 12, "LeftAlign"));
    xml.push_str(&paragraph_style(styles::AUTHOR_NAME, 2, "LeftAlign"));
    xml.push_str("  </RootParagraphStyleGroup>\n");

    xml.push_str(
        r#"  <RootObjectStyleGroup Self="u8a">
    <ObjectStyle Self="ObjectStyle/$ID/[None]" Name="$ID/[None]"/>
    <ObjectStyle Self="ObjectStyle/MediaFrame" Name="MediaFrame" StrokeWeight="0"/>
    <ObjectStyle Self="ObjectStyle/AvatarFrame" Name="AvatarFrame" StrokeWeight="0"/>
  </RootObjectStyleGroup>
"#,
    );

    xml.push_str(&close_package_root("Styles"));
    xml
}

pub fn preferences_xml(page_width: f64, page_height: f64, margins: &Margins) -> String {
    let mut xml = open_package_root("Preferences");
    xml.push_str(&format!(
        r#"  <DocumentPreference PageWidth="{w}" PageHeight="{h}" PagesPerDocument="1" FacingPages="true" PageBinding="LeftToRight"/>
  <MarginPreference ColumnCount="1" ColumnGutter="12" Top="{top}" Bottom="{bottom}" Left="{left}" Right="{right}"/>
  <TextDefault AppliedFont="Arial" PointSize="10"/>
  <ViewPreference HorizontalMeasurementUnits="Points" VerticalMeasurementUnits="Points"/>
"#,
        w = fmt_num(page_width),
        h = fmt_num(page_height),
        top = fmt_num(margins.top),
        bottom = fmt_num(margins.bottom),
        left = fmt_num(margins.left),
        right = fmt_num(margins.right),
    ));
    xml.push_str(&close_package_root("Preferences"));
    xml
}

pub fn backing_story_xml() -> String {
    let mut xml = open_package_root("BackingStory");
    xml.push_str(&format!(
        r#"  <XmlStory Self="{BACKING_STORY_ID}" UserText="true" IsEndnoteStory="false" AppliedTOCStyle="n" TrackChanges="false" StoryTitle="$ID/" AppliedNamedGrid="n">
    <ParagraphStyleRange AppliedParagraphStyle="{para}">
      <CharacterStyleRange AppliedCharacterStyle="{chr}">
        <XMLElement Self="di2" MarkupTag="XMLTag/Root"/>
        <Content></Content>
      </CharacterStyleRange>
    </ParagraphStyleRange>
  </XmlStory>
"#,
        para = styles::NO_PARAGRAPH_STYLE,
        chr = styles::NO_CHARACTER_STYLE,
    ));
    xml.push_str(&close_package_root("BackingStory"));
    xml
}

pub fn tags_xml() -> String {
    let mut xml = open_package_root("Tags");
    xml.push_str(
        r#"  <XMLTag Self="XMLTag/Root" Name="Root">
    <Properties>
      <TagColor type="enumeration">LightBlue</TagColor>
    </Properties>
  </XMLTag>
"#,
    );
    xml.push_str(&close_package_root("Tags"));
    xml
}

// ============================================================================
// Spreads
// ============================================================================

fn path_geometry(points: &[PathPoint], indent: &str) -> String {
    let pt = |(x, y): (f64, f64)| format!("{} {}", fmt_num(x), fmt_num(y));
    let mut xml = format!(
        "{indent}<Properties>\n{indent}  <PathGeometry>\n{indent}    <GeometryPathType PathOpen=\"false\">\n{indent}      <PathPointArray>\n"
    );
    for p in points {
        xml.push_str(&format!(
            "{indent}        <PathPointType Anchor=\"{}\" LeftDirection=\"{}\" RightDirection=\"{}\"/>\n",
            pt(p.anchor),
            pt(p.left),
            pt(p.right)
        ));
    }
    xml.push_str(&format!(
        "{indent}      </PathPointArray>\n{indent}    </GeometryPathType>\n{indent}  </PathGeometry>\n{indent}</Properties>\n"
    ));
    xml
}

fn text_frame_xml(frame: &TextFrame) -> String {
    let mut xml = format!(
        "    <TextFrame Self=\"{}\" ParentStory=\"{}\" PreviousTextFrame=\"n\" NextTextFrame=\"n\" ContentType=\"TextType\" ItemTransform=\"{}\">\n",
        frame.id, frame.story_id, frame.transform
    );
    xml.push_str(&path_geometry(&rect_path(&frame.bounds), "      "));
    xml.push_str("      <TextFramePreference TextColumnCount=\"1\"/>\n");
    xml.push_str("    </TextFrame>\n");
    xml
}

fn graphic_frame_xml(element: &str, object_style: &str, frame: &ImageFrame, path: &[PathPoint]) -> String {
    let (stroke_weight, stroke_color) = match frame.stroke_weight {
        Some(w) if w > 0.0 => (fmt_num(w), "Color/Black"),
        _ => ("0".to_string(), "Swatch/None"),
    };
    let w = frame.bounds.width();
    let h = frame.bounds.height();

    let mut xml = format!(
        "    <{element} Self=\"{}\" ContentType=\"GraphicType\" AppliedObjectStyle=\"ObjectStyle/{object_style}\" StrokeWeight=\"{stroke_weight}\" StrokeColor=\"{stroke_color}\" FillColor=\"Swatch/None\" ItemTransform=\"{}\">\n",
        frame.id, frame.transform
    );
    xml.push_str(&path_geometry(path, "      "));
    xml.push_str(&format!(
        "      <Image Self=\"{}\" ItemTransform=\"1 0 0 1 {} {}\">\n",
        frame.image_id,
        fmt_num(-w / 2.0),
        fmt_num(-h / 2.0)
    ));
    xml.push_str(&format!(
        "        <Properties>\n          <GraphicBounds Left=\"0\" Top=\"0\" Right=\"{}\" Bottom=\"{}\"/>\n        </Properties>\n",
        fmt_num(w),
        fmt_num(h)
    ));
    xml.push_str(&format!(
        "        <Link Self=\"{}\" LinkResourceURI=\"file:{}\"/>\n",
        frame.link_id,
        escape(&frame.link_path)
    ));
    xml.push_str("      </Image>\n");
    xml.push_str(&format!("    </{element}>\n"));
    xml
}

fn frame_xml(frame: &Frame) -> String {
    match frame {
        Frame::Text(f) => text_frame_xml(f),
        Frame::Image(f) => graphic_frame_xml("Rectangle", "MediaFrame", f, &rect_path(&f.bounds)),
        Frame::Avatar(f) => graphic_frame_xml("Oval", "AvatarFrame", f, &ellipse_path(&f.bounds)),
    }
}

/// One spread fragment with its pages and their page items.
pub fn spread_xml(spread: &Spread, page_width: f64, margins: &Margins) -> String {
    let mut xml = open_package_root("Spread");
    xml.push_str(&format!(
        "  <Spread Self=\"{}\" PageCount=\"{}\" BindingLocation=\"{}\" ItemTransform=\"{}\" FlattenerOverride=\"Default\" ShowMasterItems=\"true\" AllowPageShuffle=\"true\">\n",
        spread.id,
        spread.page_count(),
        spread.binding_location,
        spread.transform
    ));
    xml.push_str("    <FlattenerPreference/>\n");

    let column_width = page_width - margins.left - margins.right;
    for page in &spread.pages {
        xml.push_str(&format!(
            "    <Page Self=\"{}\" Name=\"{}\" GeometricBounds=\"{}\" ItemTransform=\"{}\">\n",
            page.id,
            page.number,
            page.bounds.to_idml(),
            page.transform
        ));
        xml.push_str(&format!(
            "      <MarginPreference ColumnCount=\"1\" ColumnGutter=\"12\" Top=\"{}\" Bottom=\"{}\" Left=\"{}\" Right=\"{}\" ColumnDirection=\"Horizontal\" ColumnsPositions=\"0 {}\"/>\n",
            fmt_num(margins.top),
            fmt_num(margins.bottom),
            fmt_num(margins.left),
            fmt_num(margins.right),
            fmt_num(column_width)
        ));
        xml.push_str("    </Page>\n");
    }

    // page items are children of the spread, in spread coordinates
    for frame in spread.pages.iter().flat_map(|p| &p.frames) {
        xml.push_str(&frame_xml(frame));
    }

    xml.push_str("  </Spread>\n");
    xml.push_str(&close_package_root("Spread"));
    xml
}

// ============================================================================
// Stories
// ============================================================================

fn font_style(run: &Run) -> Option<&'static str> {
    match (run.bold, run.italic) {
        (true, true) => Some("Bold Italic"),
        (true, false) => Some("Bold"),
        (false, true) => Some("Italic"),
        (false, false) => None,
    }
}

fn character_range(applied: &str, run: Option<&Run>, content: &str) -> String {
    let mut attrs = String::new();
    if let Some(run) = run {
        if let Some(style) = font_style(run) {
            attrs.push_str(&format!(" FontStyle=\"{style}\""));
        }
        if run.strike {
            attrs.push_str(" StrikeThru=\"true\"");
        }
    }
    format!(
        "      <CharacterStyleRange AppliedCharacterStyle=\"{applied}\"{attrs}>\n        {content}\n      </CharacterStyleRange>\n"
    )
}

fn story_range_xml(range: &StoryRange, breaks_after_last: bool) -> String {
    let char_style = styles::character(range.character_style);
    let mut xml = format!(
        "    <ParagraphStyleRange AppliedParagraphStyle=\"{}\">\n",
        styles::paragraph(range.paragraph_style)
    );

    let count = range.paragraphs.len();
    for (i, paragraph) in range.paragraphs.iter().enumerate() {
        for inline in &paragraph.inlines {
            match inline {
                Inline::Run(run) => {
                    let content = format!("<Content>{}</Content>", escape(&run.text));
                    xml.push_str(&character_range(&char_style, Some(run), &content));
                }
                Inline::LineBreak => {
                    let content = format!("<Content>{FORCED_LINE_BREAK}</Content>");
                    xml.push_str(&character_range(&char_style, None, &content));
                }
            }
        }
        if i + 1 < count || breaks_after_last {
            xml.push_str(&character_range(&char_style, None, "<Br/>"));
        }
    }

    xml.push_str("    </ParagraphStyleRange>\n");
    xml
}

/// One story fragment. Paragraphs are separated by `<Br/>`.
pub fn story_xml(story: &Story) -> String {
    let mut xml = open_package_root("Story");
    xml.push_str(&format!(
        "  <Story Self=\"{}\" AppliedTOCStyle=\"n\" TrackChanges=\"false\" StoryTitle=\"$ID/\" AppliedNamedGrid=\"n\">\n",
        story.id
    ));
    xml.push_str("    <StoryPreference OpticalMarginAlignment=\"false\" OpticalMarginSize=\"12\"/>\n");

    let ranges: Vec<_> = story.ranges.iter().filter(|r| !r.paragraphs.is_empty()).collect();
    for (i, range) in ranges.iter().enumerate() {
        xml.push_str(&story_range_xml(range, i + 1 < ranges.len()));
    }

    xml.push_str("  </Story>\n");
    xml.push_str(&close_package_root("Story"));
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idml::geometry::{Bounds, Transform};
    use crate::idml::model::Page;
    use crate::markup::{Paragraph, parse_markup};

    fn story(ranges: Vec<StoryRange>) -> Story {
        Story {
            id: "story_u101".into(),
            ranges,
        }
    }

    #[test]
    fn test_designmap_lists_everything() {
        let spreads = vec![Spread {
            id: "spread_u102".into(),
            pages: vec![],
            binding_location: 0,
            transform: Transform::IDENTITY,
        }];
        let stories = vec![story(vec![])];
        let xml = designmap_xml("Llamas & Co.idml", &spreads, &stories);

        assert!(xml.starts_with(XML_DECL));
        assert!(xml.contains("<?aid style=\"50\""));
        assert!(xml.contains("StoryList=\"story_u101 ub0\""));
        assert!(xml.contains("Name=\"Llamas &amp; Co.idml\""));
        assert!(xml.contains("src=\"Spreads/Spread_spread_u102.xml\""));
        assert!(xml.contains("src=\"Stories/Story_story_u101.xml\""));
        assert!(xml.contains("src=\"XML/BackingStory.xml\""));
    }

    #[test]
    fn test_story_styles_and_breaks() {
        let s = story(vec![
            StoryRange::new(styles::POST_DATE, vec![Paragraph::plain("9 апреля 2025 22:47")]),
            StoryRange::new(
                styles::POST_BODY,
                parse_markup("<p><b>Bold</b> <i>it</i> <s>x</s></p><p>a &amp; b</p>"),
            ),
        ]);
        let xml = story_xml(&s);

        assert!(xml.contains("AppliedParagraphStyle=\"ParagraphStyle/PostDate\""));
        assert!(xml.contains("AppliedParagraphStyle=\"ParagraphStyle/PostBody\""));
        assert!(xml.contains("FontStyle=\"Bold\""));
        assert!(xml.contains("FontStyle=\"Italic\""));
        assert!(xml.contains("StrikeThru=\"true\""));
        assert!(xml.contains("<Content>a &amp; b</Content>"));
        // date paragraph -> body, and between the two body paragraphs
        assert_eq!(xml.matches("<Br/>").count(), 2);
    }

    #[test]
    fn test_story_line_break_is_forced_break() {
        let s = story(vec![StoryRange::new(styles::POST_BODY, parse_markup("a<br>b"))]);
        assert!(story_xml(&s).contains("<Content>\u{2028}</Content>"));
    }

    #[test]
    fn test_spread_places_frames_after_pages() {
        let bounds = Bounds::from_size(100.0, 50.0, 200.0, 100.0);
        let spread = Spread {
            id: "spread_u102".into(),
            binding_location: 0,
            transform: Transform::IDENTITY,
            pages: vec![Page {
                id: "page_u101".into(),
                number: 1,
                bounds: Bounds::new(0.0, 0.0, 800.0, 600.0),
                transform: Transform::translate(0.0, -400.0),
                frames: vec![
                    Frame::Text(TextFrame {
                        id: "frame_u104".into(),
                        story_id: "story_u103".into(),
                        bounds,
                        transform: Transform::translate(150.0, -250.0),
                    }),
                    Frame::Avatar(ImageFrame {
                        id: "frame_u105".into(),
                        image_id: "image_u106".into(),
                        link_id: "link_u107".into(),
                        link_path: "Links/avatars/bob.jpg".into(),
                        bounds: Bounds::from_size(0.0, 0.0, 32.0, 32.0),
                        transform: Transform::IDENTITY,
                        stroke_weight: Some(1.5),
                    }),
                ],
            }],
        };
        let xml = spread_xml(&spread, 600.0, &Margins::from_array([20.0; 4]));

        let page_end = xml.find("</Page>").unwrap();
        let frame_pos = xml.find("<TextFrame").unwrap();
        assert!(frame_pos > page_end);
        assert!(xml.contains("ItemTransform=\"1 0 0 1 150 -250\""));
        assert!(xml.contains("Anchor=\"-100 -50\""));
        assert!(xml.contains("<Oval Self=\"frame_u105\""));
        assert!(xml.contains("StrokeWeight=\"1.5\""));
        assert!(xml.contains("LinkResourceURI=\"file:Links/avatars/bob.jpg\""));
        assert!(xml.contains("ColumnsPositions=\"0 560\""));
    }

    #[test]
    fn test_graphic_defines_swatches() {
        let xml = graphic_xml();
        assert!(xml.contains("Self=\"Color/Black\""));
        assert!(xml.contains("Self=\"Color/Gray\""));
        assert!(xml.contains("Self=\"Swatch/None\""));
    }

    #[test]
    fn test_metadata_ids_are_fresh() {
        let now = Utc::now();
        assert_ne!(metadata_xml(now), metadata_xml(now));
    }
}
