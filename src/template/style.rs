//! 模板的显示属性：配色、字体、字号

/// RGB 颜色（0-1 浮点）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl RgbColor {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }
}

// 文字层级
pub const WHITE: RgbColor = RgbColor::new(0.941, 0.949, 0.980);
pub const LIGHT_GRAY: RgbColor = RgbColor::new(0.627, 0.647, 0.745);

// 强调色
pub const GREEN: RgbColor = RgbColor::new(0.282, 0.780, 0.557);
pub const BLUE_LIGHT: RgbColor = RgbColor::new(0.373, 0.490, 0.912);
pub const ORANGE_ACCENT: RgbColor = RgbColor::new(1.0, 0.718, 0.302);

/// 要点符号依次使用的颜色
pub const BULLET_COLORS: [RgbColor; 3] = [GREEN, BLUE_LIGHT, ORANGE_ACCENT];

pub const FONT_BODY: &str = "Instrument Sans";
pub const FONT_DISPLAY: &str = "Outfit";
pub const FONT_MONO: &str = "Roboto Mono";

/// 元素级文字样式
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: u32,
    pub color: RgbColor,
    pub bold: bool,
    pub font_family: &'static str,
}

impl TextStyle {
    /// 正文字体
    pub const fn body(font_size: u32, color: RgbColor) -> Self {
        Self {
            font_size,
            color,
            bold: false,
            font_family: FONT_BODY,
        }
    }

    /// 标题字体（加粗）
    pub const fn display(font_size: u32, color: RgbColor) -> Self {
        Self {
            font_size,
            color,
            bold: true,
            font_family: FONT_DISPLAY,
        }
    }

    /// 等宽数字（加粗）
    pub const fn mono(font_size: u32, color: RgbColor) -> Self {
        Self {
            font_size,
            color,
            bold: true,
            font_family: FONT_MONO,
        }
    }

    pub const fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// 局部样式（覆盖在整段样式之上）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStyle {
    pub color: RgbColor,
    pub bold: bool,
    pub font_size: Option<u32>,
    pub font_family: Option<&'static str>,
}

impl From<TextStyle> for RunStyle {
    fn from(style: TextStyle) -> Self {
        Self {
            color: style.color,
            bold: style.bold,
            font_size: Some(style.font_size),
            font_family: Some(style.font_family),
        }
    }
}
