//! `turtlesim/SetPen`: change the colour and width of the trail, or lift the pen.

ros_service! {
    SetPen,
    md5sum: "9f452acce566bf0c0954594f69a8e41b",
    request: SetPenRequest {
        md5sum: "9f452acce566bf0c0954594f69a8e41b",
        definition: "uint8 r\nuint8 g\nuint8 b\nuint8 width\nuint8 off\n",
        fields: {
            r: u8,
            g: u8,
            b: u8,
            width: u8,
            /// Non-zero lifts the pen.
            off: u8,
        },
    },
    response: SetPenResponse {
        md5sum: "d41d8cd98f00b204e9800998ecf8427e",
        definition: "",
        fields: {},
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srv::RosMessage;

    #[test]
    fn test_request_bytes() {
        let request = SetPenRequest {
            r: 69,
            g: 86,
            b: 255,
            width: 3,
            off: 0,
        };
        assert_eq!(request.to_bytes(), vec![69, 86, 255, 3, 0]);
        assert_eq!(SetPenRequest::from_bytes(&[69, 86, 255, 3, 0]).unwrap(), request);
    }

    #[test]
    fn test_truncated_request() {
        assert!(SetPenRequest::from_bytes(&[1, 2, 3]).is_err());
    }
}
