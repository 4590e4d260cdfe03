//! Chart part (`xl/charts/chartN.xml`) serialization

use std::io::Write;

use autochart_chart::{
    Axis, AxisKind, AxisPosition, Chart, ChartKind, DataCache, DataReference, DataSeries,
    DataTable, Legend,
};

use crate::xml::escape_xml;

const CHART_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
const DRAWING_MAIN_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Serialize a chart to a chart part
pub(crate) fn chart_xml(chart: &Chart) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_chart(&mut out, chart)?;
    Ok(out)
}

/// Write a chart to XML.
pub(crate) fn write_chart<W: Write>(writer: &mut W, chart: &Chart) -> std::io::Result<()> {
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    write!(
        writer,
        r#"<c:chartSpace xmlns:c="{}" xmlns:a="{}" xmlns:r="{}">"#,
        CHART_NS,
        DRAWING_MAIN_NS,
        crate::rels::OFFICE_REL_NS
    )?;
    write!(writer, r#"<c:roundedCorners val="0"/>"#)?;
    write!(writer, r#"<c:style val="{}"/>"#, chart.style)?;

    write!(writer, "<c:chart>")?;

    if let Some(ref title) = chart.title {
        write_title(writer, title)?;
    }
    write!(writer, r#"<c:autoTitleDeleted val="0"/>"#)?;

    write_plot_area(writer, chart)?;

    if let Some(ref legend) = chart.legend {
        write_legend(writer, legend)?;
    }

    write!(writer, r#"<c:plotVisOnly val="1"/>"#)?;
    write!(writer, r#"<c:dispBlanksAs val="gap"/>"#)?;
    write!(writer, "</c:chart>")?;
    write!(writer, "</c:chartSpace>")?;

    Ok(())
}

fn write_title<W: Write>(writer: &mut W, title: &str) -> std::io::Result<()> {
    write!(writer, "<c:title><c:tx><c:rich>")?;
    write!(writer, "<a:bodyPr/><a:lstStyle/>")?;
    write!(writer, "<a:p><a:pPr><a:defRPr/></a:pPr>")?;
    write!(writer, "<a:r><a:t>{}</a:t></a:r>", escape_xml(title))?;
    write!(writer, "</a:p></c:rich></c:tx>")?;
    write!(writer, r#"<c:overlay val="0"/>"#)?;
    write!(writer, "</c:title>")?;
    Ok(())
}

fn write_plot_area<W: Write>(writer: &mut W, chart: &Chart) -> std::io::Result<()> {
    write!(writer, "<c:plotArea>")?;
    write!(writer, "<c:layout/>")?;

    write_type_group(writer, chart)?;

    for axis in &chart.axes {
        write_axis(writer, axis, chart.kind)?;
    }

    if let Some(table) = chart.data_table {
        write_data_table(writer, &table)?;
    }

    write!(writer, "</c:plotArea>")?;
    Ok(())
}

fn write_type_group<W: Write>(writer: &mut W, chart: &Chart) -> std::io::Result<()> {
    let tag = match chart.kind {
        ChartKind::Bar => "c:barChart",
        ChartKind::Line => "c:lineChart",
        ChartKind::Area => "c:areaChart",
        ChartKind::Bubble => "c:bubbleChart",
        ChartKind::Radar => "c:radarChart",
        ChartKind::Pie => "c:pieChart",
        ChartKind::Doughnut => "c:doughnutChart",
        ChartKind::Scatter => "c:scatterChart",
    };
    write!(writer, "<{}>", tag)?;

    match chart.kind {
        ChartKind::Bar => {
            write!(writer, r#"<c:barDir val="col"/>"#)?;
            write!(writer, r#"<c:grouping val="clustered"/>"#)?;
        }
        ChartKind::Line | ChartKind::Area => {
            write!(writer, r#"<c:grouping val="standard"/>"#)?;
        }
        ChartKind::Radar => write!(writer, r#"<c:radarStyle val="standard"/>"#)?,
        ChartKind::Scatter => write!(writer, r#"<c:scatterStyle val="lineMarker"/>"#)?,
        ChartKind::Pie | ChartKind::Doughnut | ChartKind::Bubble => {}
    }

    let vary_colors = matches!(chart.kind, ChartKind::Pie | ChartKind::Doughnut);
    write!(
        writer,
        r#"<c:varyColors val="{}"/>"#,
        if vary_colors { "1" } else { "0" }
    )?;

    for (i, series) in chart.series.iter().enumerate() {
        write_series(writer, chart.kind, i, series)?;
    }

    match chart.kind {
        ChartKind::Bar => write!(writer, r#"<c:gapWidth val="150"/>"#)?,
        ChartKind::Line => write!(writer, r#"<c:marker val="1"/>"#)?,
        ChartKind::Pie => write!(writer, r#"<c:firstSliceAng val="0"/>"#)?,
        ChartKind::Doughnut => {
            write!(writer, r#"<c:firstSliceAng val="0"/>"#)?;
            write!(writer, r#"<c:holeSize val="10"/>"#)?;
        }
        ChartKind::Bubble => {
            write!(writer, r#"<c:bubbleScale val="100"/>"#)?;
            write!(writer, r#"<c:showNegBubbles val="0"/>"#)?;
        }
        ChartKind::Area | ChartKind::Radar | ChartKind::Scatter => {}
    }

    for axis in &chart.axes {
        write!(writer, r#"<c:axId val="{}"/>"#, axis.id)?;
    }

    write!(writer, "</{}>", tag)?;
    Ok(())
}

fn write_series<W: Write>(
    writer: &mut W,
    kind: ChartKind,
    index: usize,
    series: &DataSeries,
) -> std::io::Result<()> {
    write!(writer, "<c:ser>")?;
    write!(writer, r#"<c:idx val="{}"/>"#, index)?;
    write!(writer, r#"<c:order val="{}"/>"#, index)?;

    if let Some(ref name) = series.name {
        write!(writer, "<c:tx>")?;
        write_string_ref(writer, name)?;
        write!(writer, "</c:tx>")?;
    }

    if kind == ChartKind::Bar || kind == ChartKind::Bubble {
        write!(writer, r#"<c:invertIfNegative val="0"/>"#)?;
    }

    if kind.is_xy() {
        if let Some(ref x_values) = series.categories {
            write_data_ref(writer, "c:xVal", x_values)?;
        }
        write_data_ref(writer, "c:yVal", &series.values)?;
        if kind == ChartKind::Bubble {
            write_data_ref(writer, "c:bubbleSize", &series.values)?;
            write!(writer, r#"<c:bubble3D val="0"/>"#)?;
        }
    } else {
        if let Some(ref categories) = series.categories {
            write_data_ref(writer, "c:cat", categories)?;
        }
        write_data_ref(writer, "c:val", &series.values)?;
    }

    if kind == ChartKind::Line || kind == ChartKind::Scatter {
        write!(writer, r#"<c:smooth val="0"/>"#)?;
    }

    write!(writer, "</c:ser>")?;
    Ok(())
}

/// Write `<tag>` holding a `strRef` or `numRef`, depending on the cached values
fn write_data_ref<W: Write>(
    writer: &mut W,
    tag: &str,
    data: &DataReference,
) -> std::io::Result<()> {
    write!(writer, "<{}>", tag)?;
    match data.cache {
        DataCache::Strings(_) => write_string_ref(writer, data)?,
        DataCache::Numbers(_) | DataCache::None => write_numeric_ref(writer, data)?,
    }
    write!(writer, "</{}>", tag)?;
    Ok(())
}

fn write_string_ref<W: Write>(writer: &mut W, data: &DataReference) -> std::io::Result<()> {
    write!(writer, "<c:strRef>")?;
    write!(writer, "<c:f>{}</c:f>", escape_xml(&data.formula))?;

    match data.cache {
        DataCache::Strings(ref values) => {
            write!(writer, "<c:strCache>")?;
            write!(writer, r#"<c:ptCount val="{}"/>"#, values.len())?;
            for (i, val) in values.iter().enumerate() {
                if let Some(val) = val {
                    write!(
                        writer,
                        r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
                        i,
                        escape_xml(val)
                    )?;
                }
            }
            write!(writer, "</c:strCache>")?;
        }
        DataCache::Numbers(ref values) => {
            write!(writer, "<c:strCache>")?;
            write!(writer, r#"<c:ptCount val="{}"/>"#, values.len())?;
            for (i, val) in values.iter().enumerate() {
                if let Some(val) = val {
                    write!(writer, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, i, val)?;
                }
            }
            write!(writer, "</c:strCache>")?;
        }
        DataCache::None => {}
    }

    write!(writer, "</c:strRef>")?;
    Ok(())
}

fn write_numeric_ref<W: Write>(writer: &mut W, data: &DataReference) -> std::io::Result<()> {
    write!(writer, "<c:numRef>")?;
    write!(writer, "<c:f>{}</c:f>", escape_xml(&data.formula))?;

    if let DataCache::Numbers(ref values) = data.cache {
        write!(writer, "<c:numCache>")?;
        write!(writer, "<c:formatCode>General</c:formatCode>")?;
        write!(writer, r#"<c:ptCount val="{}"/>"#, values.len())?;
        for (i, val) in values.iter().enumerate() {
            if let Some(val) = val {
                write!(writer, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, i, val)?;
            }
        }
        write!(writer, "</c:numCache>")?;
    }

    write!(writer, "</c:numRef>")?;
    Ok(())
}

fn write_axis<W: Write>(writer: &mut W, axis: &Axis, kind: ChartKind) -> std::io::Result<()> {
    let tag = match axis.kind {
        AxisKind::Category => "c:catAx",
        AxisKind::Value => "c:valAx",
    };
    write!(writer, "<{}>", tag)?;
    write!(writer, r#"<c:axId val="{}"/>"#, axis.id)?;
    write!(writer, r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="0"/>"#)?;
    write!(writer, r#"<c:axPos val="{}"/>"#, axis.position.xml_value())?;

    // Gridlines run off the vertical value axis
    if axis.kind == AxisKind::Value && axis.position == AxisPosition::Left {
        write!(writer, "<c:majorGridlines/>")?;
    }

    write!(writer, r#"<c:majorTickMark val="out"/>"#)?;
    write!(writer, r#"<c:minorTickMark val="none"/>"#)?;
    write!(writer, r#"<c:tickLblPos val="nextTo"/>"#)?;
    write!(writer, r#"<c:crossAx val="{}"/>"#, axis.cross_id)?;
    write!(writer, r#"<c:crosses val="autoZero"/>"#)?;

    match axis.kind {
        AxisKind::Category => {
            write!(writer, r#"<c:auto val="1"/>"#)?;
            write!(writer, r#"<c:lblAlgn val="ctr"/>"#)?;
            write!(writer, r#"<c:lblOffset val="100"/>"#)?;
            write!(writer, r#"<c:noMultiLvlLbl val="0"/>"#)?;
        }
        AxisKind::Value => {
            let between = if kind.is_xy() { "midCat" } else { "between" };
            write!(writer, r#"<c:crossBetween val="{}"/>"#, between)?;
        }
    }

    write!(writer, "</{}>", tag)?;
    Ok(())
}

fn write_data_table<W: Write>(writer: &mut W, table: &DataTable) -> std::io::Result<()> {
    let flag = |on: bool| if on { "1" } else { "0" };
    write!(writer, "<c:dTable>")?;
    write!(
        writer,
        r#"<c:showHorzBorder val="{}"/>"#,
        flag(table.show_horz_border)
    )?;
    write!(
        writer,
        r#"<c:showVertBorder val="{}"/>"#,
        flag(table.show_vert_border)
    )?;
    write!(writer, r#"<c:showOutline val="{}"/>"#, flag(table.show_outline))?;
    write!(writer, r#"<c:showKeys val="{}"/>"#, flag(table.show_keys))?;
    write!(writer, "</c:dTable>")?;
    Ok(())
}

fn write_legend<W: Write>(writer: &mut W, legend: &Legend) -> std::io::Result<()> {
    write!(writer, "<c:legend>")?;
    write!(
        writer,
        r#"<c:legendPos val="{}"/>"#,
        legend.position.xml_value()
    )?;
    write!(
        writer,
        r#"<c:overlay val="{}"/>"#,
        if legend.overlay { "1" } else { "0" }
    )?;
    write!(writer, "</c:legend>")?;
    Ok(())
}
