//! XML parts of a minimal PresentationML package.
//!
//! The package holds one slide master, one blank layout and one theme; slides
//! reference the blank layout and contain nothing but pictures.

use super::{ImageFormat, Presentation, Slide};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Number of fixed relationships in `presentation.xml.rels` before the slides.
pub(crate) const PRESENTATION_FIXED_RELS: usize = 5;

/// First `p:sldId` value; ids below 256 are reserved.
const FIRST_SLIDE_ID: usize = 256;

fn xml_header() -> String {
    XML_DECL.to_string()
}

fn ns_attrs() -> String {
    format!(r#"xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}""#)
}

/// Escape text for use in XML attributes and character data.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn empty_sp_tree_head() -> &'static str {
    concat!(
        r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
        r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
    )
}

struct Rel {
    id: String,
    kind: String,
    target: String,
}

fn rel(id: impl Into<String>, kind: impl Into<String>, target: impl Into<String>) -> Rel {
    Rel {
        id: id.into(),
        kind: kind.into(),
        target: target.into(),
    }
}

fn relationships(rels: &[Rel]) -> String {
    let mut xml = xml_header();
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for r in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            r.id, r.kind, r.target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn rel_type(name: &str) -> String {
    format!("{REL_BASE}/{name}")
}

// ── Package level ────────────────────────────────────────────────────────

pub(crate) fn content_types_xml(pres: &Presentation) -> String {
    let main = "application/vnd.openxmlformats-officedocument.presentationml";
    let mut xml = xml_header();
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for format in [ImageFormat::Jpeg, ImageFormat::Png] {
        xml.push_str(&format!(
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            format.extension(),
            format.mime_type()
        ));
    }

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), format!("{main}.presentation.main+xml")),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), format!("{main}.slideMaster+xml")),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), format!("{main}.slideLayout+xml")),
        (
            "/ppt/theme/theme1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
        ),
        ("/ppt/presProps.xml".to_string(), format!("{main}.presProps+xml")),
        ("/ppt/viewProps.xml".to_string(), format!("{main}.viewProps+xml")),
        ("/ppt/tableStyles.xml".to_string(), format!("{main}.tableStyles+xml")),
        (
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
        (
            "/docProps/app.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
        ),
    ];
    for n in 1..=pres.slides.len() {
        overrides.push((format!("/ppt/slides/slide{n}.xml"), format!("{main}.slide+xml")));
    }
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{part}" ContentType="{content_type}"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

pub(crate) fn root_rels_xml() -> String {
    relationships(&[
        rel("rId1", rel_type("officeDocument"), "ppt/presentation.xml"),
        rel(
            "rId2",
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        ),
        rel("rId3", rel_type("extended-properties"), "docProps/app.xml"),
    ])
}

pub(crate) fn core_props_xml(title: &str) -> String {
    let mut xml = xml_header();
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    xml.push_str("<dc:creator>pdf2deck</dc:creator>");
    xml.push_str("</cp:coreProperties>");
    xml
}

pub(crate) fn app_props_xml(slide_count: usize) -> String {
    let mut xml = xml_header();
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    xml.push_str("<Application>pdf2deck</Application>");
    xml.push_str(&format!("<Slides>{slide_count}</Slides>"));
    xml.push_str("</Properties>");
    xml
}

// ── Presentation part ────────────────────────────────────────────────────

pub(crate) fn slide_rel_id(index: usize) -> String {
    format!("rId{}", PRESENTATION_FIXED_RELS + 1 + index)
}

pub(crate) fn presentation_xml(pres: &Presentation) -> String {
    let mut xml = xml_header();
    xml.push_str(&format!(r#"<p:presentation {} saveSubsetFonts="1">"#, ns_attrs()));
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if !pres.slides.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for index in 0..pres.slides.len() {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                FIRST_SLIDE_ID + index,
                slide_rel_id(index)
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}"/>"#,
        pres.slide_width, pres.slide_height
    ));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

pub(crate) fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = vec![
        rel("rId1", rel_type("slideMaster"), "slideMasters/slideMaster1.xml"),
        rel("rId2", rel_type("presProps"), "presProps.xml"),
        rel("rId3", rel_type("viewProps"), "viewProps.xml"),
        rel("rId4", rel_type("theme"), "theme/theme1.xml"),
        rel("rId5", rel_type("tableStyles"), "tableStyles.xml"),
    ];
    for index in 0..slide_count {
        rels.push(rel(
            slide_rel_id(index),
            rel_type("slide"),
            format!("slides/slide{}.xml", index + 1),
        ));
    }
    relationships(&rels)
}

pub(crate) fn pres_props_xml() -> String {
    format!("{}<p:presentationPr {}/>", xml_header(), ns_attrs())
}

pub(crate) fn view_props_xml() -> String {
    format!(
        "{}<p:viewPr {}><p:gridSpacing cx=\"76200\" cy=\"76200\"/></p:viewPr>",
        xml_header(),
        ns_attrs()
    )
}

pub(crate) fn table_styles_xml() -> String {
    format!(
        r#"{}<a:tblStyleLst xmlns:a="{NS_A}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        xml_header()
    )
}

// ── Master, layout, theme ────────────────────────────────────────────────

pub(crate) fn slide_master_xml() -> String {
    let mut xml = xml_header();
    xml.push_str(&format!("<p:sldMaster {}>", ns_attrs()));
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#);
    xml.push_str(empty_sp_tree_head());
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
        r#"hlink="hlink" folHlink="folHlink"/>"#
    ));
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("</p:sldMaster>");
    xml
}

pub(crate) fn slide_master_rels_xml() -> String {
    relationships(&[
        rel("rId1", rel_type("slideLayout"), "../slideLayouts/slideLayout1.xml"),
        rel("rId2", rel_type("theme"), "../theme/theme1.xml"),
    ])
}

pub(crate) fn blank_layout_xml() -> String {
    let mut xml = xml_header();
    xml.push_str(&format!(
        r#"<p:sldLayout {} type="blank" preserve="1">"#,
        ns_attrs()
    ));
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    xml.push_str(empty_sp_tree_head());
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

pub(crate) fn blank_layout_rels_xml() -> String {
    relationships(&[rel(
        "rId1",
        rel_type("slideMaster"),
        "../slideMasters/slideMaster1.xml",
    )])
}

pub(crate) fn theme_xml() -> String {
    let accents = ["4F81BD", "C0504D", "9BBB59", "8064A2", "4BACC6", "F79646"];
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;

    let mut xml = xml_header();
    xml.push_str(&format!(r#"<a:theme xmlns:a="{NS_A}" name="Office Theme">"#));
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    xml.push_str(r#"<a:dk2><a:srgbClr val="1F497D"/></a:dk2>"#);
    xml.push_str(r#"<a:lt2><a:srgbClr val="EEECE1"/></a:lt2>"#);
    for (i, color) in accents.iter().enumerate() {
        let n = i + 1;
        xml.push_str(&format!(
            r#"<a:accent{n}><a:srgbClr val="{color}"/></a:accent{n}>"#
        ));
    }
    xml.push_str(r#"<a:hlink><a:srgbClr val="0000FF"/></a:hlink>"#);
    xml.push_str(r#"<a:folHlink><a:srgbClr val="800080"/></a:folHlink>"#);
    xml.push_str("</a:clrScheme>");

    let font = r#"<a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/>"#;
    xml.push_str(&format!(
        r#"<a:fontScheme name="Office"><a:majorFont>{font}</a:majorFont><a:minorFont>{font}</a:minorFont></a:fontScheme>"#
    ));

    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    xml.push_str(&format!("<a:fillStyleLst>{}</a:fillStyleLst>", solid.repeat(3)));
    xml.push_str(&format!(
        "<a:lnStyleLst>{}</a:lnStyleLst>",
        format!(r#"<a:ln w="9525">{solid}</a:ln>"#).repeat(3)
    ));
    xml.push_str(&format!(
        "<a:effectStyleLst>{}</a:effectStyleLst>",
        "<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3)
    ));
    xml.push_str(&format!("<a:bgFillStyleLst>{}</a:bgFillStyleLst>", solid.repeat(3)));
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    xml
}

// ── Slides ───────────────────────────────────────────────────────────────

/// Relationship id of the `index`-th picture of a slide (rId1 is the layout).
pub(crate) fn picture_rel_id(index: usize) -> String {
    format!("rId{}", index + 2)
}

pub(crate) fn slide_xml(slide: &Slide) -> String {
    let mut xml = xml_header();
    xml.push_str(&format!("<p:sld {}>", ns_attrs()));
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(empty_sp_tree_head());

    for (index, pic) in slide.pictures.iter().enumerate() {
        // Shape id 1 is the group root.
        let shape_id = index + 2;
        xml.push_str("<p:pic>");
        xml.push_str(&format!(
            r#"<p:nvPicPr><p:cNvPr id="{shape_id}" name="Picture {shape_id}" descr="{}"/>"#,
            escape_xml(&pic.description)
        ));
        xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
        xml.push_str(&format!(
            r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            picture_rel_id(index)
        ));
        xml.push_str(&format!(
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            pic.x, pic.y, pic.cx, pic.cy
        ));
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#);
        xml.push_str("</p:pic>");
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

/// Relationships of one slide; `media_names` are the package names of its pictures.
pub(crate) fn slide_rels_xml(media_names: &[String]) -> String {
    let mut rels = vec![rel(
        "rId1",
        rel_type("slideLayout"),
        "../slideLayouts/slideLayout1.xml",
    )];
    for (index, name) in media_names.iter().enumerate() {
        rels.push(rel(picture_rel_id(index), rel_type("image"), format!("../media/{name}")));
    }
    relationships(&rels)
}
